//! # Graph Error Types
//!
//! Structured error handling for the execution graph core using thiserror.
//!
//! Three families, matching how the scheduler loop must react:
//! - `TaskNotFound` / `TaskCodeNotFound`: caller error, abort the run.
//! - `InvalidArgument` variants (duplicate registration, dangling or
//!   non-positive relation endpoints, cycles, malformed branch payloads,
//!   incomplete builders): caller error, abort the run.
//! - `InconsistentState`: the orchestrator called the graph out of sync
//!   with persisted task state; fatal to the current task's handling.

use thiserror::Error;

use crate::constants::ExecutionStatus;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Task not found in graph: {name}")]
    TaskNotFound { name: String },

    #[error("Task code not found in graph: {code}")]
    TaskCodeNotFound { code: i64 },

    #[error("Duplicate task node: {name}")]
    DuplicateNode { name: String },

    #[error("Duplicate edge: {pre} -> {post}")]
    DuplicateEdge { pre: String, post: String },

    #[error("Relation endpoint not registered: {name}")]
    DanglingRelation { name: String },

    #[error("Invalid relation: both endpoint codes are non-positive ({pre_code}, {post_code})")]
    InvalidRelationCodes { pre_code: i64, post_code: i64 },

    #[error("Workflow graph contains a cycle involving {remaining} task(s)")]
    CycleDetected { remaining: usize },

    #[error("Invalid branch result for task {name}: {reason}")]
    InvalidBranchResult { name: String, reason: String },

    #[error("Visitor builder incomplete: {missing} is not set")]
    BuilderIncomplete { missing: &'static str },

    #[error(
        "Inconsistent state for task {name}: expected recorded status {expected}, found {actual}"
    )]
    InconsistentState {
        name: String,
        expected: ExecutionStatus,
        actual: String,
    },
}

impl GraphError {
    /// Create a not-found error for a task name
    pub fn task_not_found(name: impl Into<String>) -> Self {
        Self::TaskNotFound { name: name.into() }
    }

    /// Create a not-found error for a task code
    pub fn task_code_not_found(code: i64) -> Self {
        Self::TaskCodeNotFound { code }
    }

    /// Create a malformed-branch-result error
    pub fn invalid_branch_result(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBranchResult {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a status-mismatch error for a `mark_chain_*` assertion
    pub fn inconsistent_state(
        name: impl Into<String>,
        expected: ExecutionStatus,
        actual: impl Into<String>,
    ) -> Self {
        Self::InconsistentState {
            name: name.into(),
            expected,
            actual: actual.into(),
        }
    }

    /// Check if this error is a caller error the scheduler loop should
    /// treat as a workflow-construction failure
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::InconsistentState { .. })
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
