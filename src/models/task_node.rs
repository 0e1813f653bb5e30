//! # Task Node and Instance
//!
//! `TaskNode` is the definition-level node of the workflow DAG: a name
//! unique within the workflow, a numeric code stable across definition
//! versions, a task-type tag, and a forbidden flag. Once the orchestrator
//! instantiates the task for a run it also carries a `TaskInstance` — the
//! runtime record owned by the orchestrator. The graph reads the instance
//! (status, recorded result) but never writes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ExecutionStatus, TaskType};

/// Externally-owned runtime record for one task in one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    pub status: ExecutionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Recorded result payload; for condition/switch tasks this holds the
    /// branch-result record the adjuster parses
    pub result: Option<serde_json::Value>,
}

impl TaskInstance {
    pub fn new(status: ExecutionStatus) -> Self {
        Self {
            status,
            started_at: None,
            ended_at: None,
            result: None,
        }
    }

    pub fn with_result(status: ExecutionStatus, result: serde_json::Value) -> Self {
        Self {
            status,
            started_at: None,
            ended_at: None,
            result: Some(result),
        }
    }
}

/// Definition-level task node, optionally annotated with its run instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Unique within the workflow definition
    pub name: String,
    /// Stable identity across definition versions
    pub code: i64,
    pub task_type: TaskType,
    /// Forbidden tasks stay in the DAG but are never adjusted for branches
    pub forbidden: bool,
    pub instance: Option<TaskInstance>,
}

impl TaskNode {
    pub fn new(name: impl Into<String>, code: i64, task_type: TaskType) -> Self {
        Self {
            name: name.into(),
            code,
            task_type,
            forbidden: false,
            instance: None,
        }
    }

    /// Convenience constructor for an ordinary task
    pub fn ordinary(name: impl Into<String>, code: i64) -> Self {
        Self::new(name, code, TaskType::Ordinary)
    }

    pub fn forbidden(mut self) -> Self {
        self.forbidden = true;
        self
    }

    pub fn with_instance(mut self, instance: TaskInstance) -> Self {
        self.instance = Some(instance);
        self
    }

    pub fn is_condition(&self) -> bool {
        self.task_type == TaskType::Condition
    }

    pub fn is_switch(&self) -> bool {
        self.task_type == TaskType::Switch
    }

    pub fn is_forbidden(&self) -> bool {
        self.forbidden
    }

    /// Recorded execution status, if the task has been instantiated
    pub fn status(&self) -> Option<ExecutionStatus> {
        self.instance.as_ref().map(|i| i.status)
    }

    /// Recorded result payload, if any
    pub fn result(&self) -> Option<&serde_json::Value> {
        self.instance.as_ref().and_then(|i| i.result.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_construction() {
        let node = TaskNode::new("validate", 3, TaskType::Condition).forbidden();
        assert_eq!(node.name, "validate");
        assert_eq!(node.code, 3);
        assert!(node.is_condition());
        assert!(!node.is_switch());
        assert!(node.is_forbidden());
        assert_eq!(node.status(), None);
    }

    #[test]
    fn test_instance_status_and_result() {
        let payload = serde_json::json!({"nextNode": 5});
        let node = TaskNode::new("route", 4, TaskType::Switch)
            .with_instance(TaskInstance::with_result(ExecutionStatus::Success, payload.clone()));
        assert_eq!(node.status(), Some(ExecutionStatus::Success));
        assert_eq!(node.result(), Some(&payload));
    }
}
