//! # System Constants
//!
//! Core enums and operational bounds shared across the workflow execution
//! graph: task-type tags, runtime execution statuses, and defensive limits
//! on graph size and traversal depth.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task-type tag carried by every definition node.
///
/// The graph only branches on `Condition` and `Switch`; every other type
/// follows plain DAG edges. `SubWorkflow` and `Dependent` are carried so
/// definitions round-trip, but the adjuster treats them as ordinary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Ordinary,
    Condition,
    Switch,
    SubWorkflow,
    Dependent,
}

impl TaskType {
    /// Check if this type resolves its effective successors from a recorded
    /// branch result instead of static edges alone
    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Condition | Self::Switch)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => write!(f, "ordinary"),
            Self::Condition => write!(f, "condition"),
            Self::Switch => write!(f, "switch"),
            Self::SubWorkflow => write!(f, "sub_workflow"),
            Self::Dependent => write!(f, "dependent"),
        }
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ordinary" => Ok(Self::Ordinary),
            "condition" => Ok(Self::Condition),
            "switch" => Ok(Self::Switch),
            "sub_workflow" => Ok(Self::SubWorkflow),
            "dependent" => Ok(Self::Dependent),
            _ => Err(format!("Invalid task type: {s}")),
        }
    }
}

impl Default for TaskType {
    fn default() -> Self {
        Self::Ordinary
    }
}

/// Execution status of a task instance.
///
/// Ownership of the status belongs to the orchestrator; the graph reads it
/// only for the `mark_chain_*` consistency assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Instance created, not yet dispatched
    Submitted,
    /// Dispatched to a worker and running
    Running,
    /// Finished successfully
    Success,
    /// Finished with an error
    Failure,
    /// Paused by operator request
    Pause,
    /// Killed by operator request
    Kill,
}

impl ExecutionStatus {
    /// Check if this is a terminal status (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Pause | Self::Kill)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, Self::Pause)
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, Self::Kill)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Running => write!(f, "running"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Pause => write!(f, "pause"),
            Self::Kill => write!(f, "kill"),
        }
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "pause" => Ok(Self::Pause),
            "kill" => Ok(Self::Kill),
            _ => Err(format!("Invalid execution status: {s}")),
        }
    }
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

/// System-wide bounds
pub mod system {
    /// Maximum number of tasks in a single workflow definition
    pub const MAX_WORKFLOW_TASKS: usize = 1000;

    /// Maximum traversal depth for closure computation
    pub const MAX_DEPENDENCY_DEPTH: usize = 50;
}
