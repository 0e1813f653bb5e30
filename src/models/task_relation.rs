//! # Task Relation
//!
//! Directed precedence relation between two tasks of one workflow
//! definition: the upstream task must finish before the downstream task
//! may trigger. Relations carry both names and codes; names key the graph,
//! codes survive definition-version changes.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRelation {
    pub pre_task_code: i64,
    pub pre_task_name: String,
    pub post_task_code: i64,
    pub post_task_name: String,
}

impl TaskRelation {
    pub fn new(
        pre_task_name: impl Into<String>,
        pre_task_code: i64,
        post_task_name: impl Into<String>,
        post_task_code: i64,
    ) -> Self {
        Self {
            pre_task_code,
            pre_task_name: pre_task_name.into(),
            post_task_code,
            post_task_name: post_task_name.into(),
        }
    }

    /// Validate endpoint codes. A relation whose endpoints are both
    /// non-positive codes cannot reference real tasks in any definition
    /// version and is rejected outright.
    pub fn validate(&self) -> Result<()> {
        if self.pre_task_code <= 0 && self.post_task_code <= 0 {
            return Err(GraphError::InvalidRelationCodes {
                pre_code: self.pre_task_code,
                post_code: self.post_task_code,
            });
        }
        Ok(())
    }
}
