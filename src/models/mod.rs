//! # Data Model
//!
//! Definition-level and runtime-level types for workflow tasks: the
//! immutable task node and its precedence relations, the externally-owned
//! runtime instance record, and the recorded branch-result payloads parsed
//! by the successor flow adjuster.

pub mod branch_result;
pub mod task_node;
pub mod task_relation;

pub use branch_result::{ConditionResult, SwitchResult, SwitchResultBranch};
pub use task_node::{TaskInstance, TaskNode};
pub use task_relation::TaskRelation;
