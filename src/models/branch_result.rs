//! # Branch Result Payloads
//!
//! Recorded-result formats for branch tasks. The orchestrator attaches one
//! of these (as JSON) to a condition/switch task instance after execution;
//! the successor flow adjuster parses it to decide which branches are
//! skipped. The wire form is camelCase to match the record produced by the
//! task workers.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::models::TaskNode;

/// Recorded result of a CONDITION task.
///
/// `success_node` lists the task codes to follow when the condition held,
/// `failed_node` the codes to follow when it did not. The branch *not*
/// taken is the one that gets skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionResult {
    pub condition_result: bool,
    #[serde(default)]
    pub success_node: Vec<i64>,
    #[serde(default)]
    pub failed_node: Vec<i64>,
}

impl ConditionResult {
    /// Parse the recorded payload off a condition task instance.
    ///
    /// A missing or malformed payload is an invalid-argument error: the
    /// orchestrator must treat the task as stuck rather than silently
    /// proceeding with no branch adjustment.
    pub fn from_task(task: &TaskNode) -> Result<Self> {
        let payload = task.result().ok_or_else(|| {
            GraphError::invalid_branch_result(&task.name, "no recorded result payload")
        })?;
        serde_json::from_value(payload.clone())
            .map_err(|e| GraphError::invalid_branch_result(&task.name, e.to_string()))
    }

    /// Task codes of the branch that was not taken
    pub fn skip_nodes(&self) -> &[i64] {
        if self.condition_result {
            &self.failed_node
        } else {
            &self.success_node
        }
    }

    /// Task codes of the branch that was taken
    pub fn trigger_nodes(&self) -> &[i64] {
        if self.condition_result {
            &self.success_node
        } else {
            &self.failed_node
        }
    }
}

/// One candidate branch of a SWITCH task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchResultBranch {
    /// Branch expression as recorded; `None` marks the default branch
    pub condition: Option<String>,
    pub next_node: i64,
}

/// Recorded result of a SWITCH task.
///
/// `next_node` is the branch actually taken; `depend_task_list` holds the
/// candidate branches the switch evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchResult {
    #[serde(default)]
    pub depend_task_list: Vec<SwitchResultBranch>,
    pub next_node: i64,
}

impl SwitchResult {
    /// Parse the recorded payload off a switch task instance.
    pub fn from_task(task: &TaskNode) -> Result<Self> {
        let payload = task.result().ok_or_else(|| {
            GraphError::invalid_branch_result(&task.name, "no recorded result payload")
        })?;
        serde_json::from_value(payload.clone())
            .map_err(|e| GraphError::invalid_branch_result(&task.name, e.to_string()))
    }

    /// Candidate branch codes minus the branch actually taken — the set
    /// the adjuster marks skipped
    pub fn skip_nodes(&self) -> Vec<i64> {
        let mut candidates: Vec<i64> = self
            .depend_task_list
            .iter()
            .map(|b| b.next_node)
            .chain(std::iter::once(self.next_node))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates.retain(|&code| code != self.next_node);
        candidates
    }
}
