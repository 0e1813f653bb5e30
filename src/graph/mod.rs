//! # Workflow Graphs
//!
//! Two DAG layers over one workflow run:
//!
//! - [`WorkflowGraph`]: the immutable definition-level DAG, built once per
//!   workflow version from a task list and its precedence relations.
//! - [`ExecutionGraph`]: the mutable run-level DAG mirroring that
//!   topology, annotated with per-task runtime state (active, skipped,
//!   failed/paused/killed chains) and queried by the scheduler loop for
//!   trigger decisions.
//!
//! [`SharedExecutionGraph`] wraps an `ExecutionGraph` behind a per-run
//! mutex so concurrent task lifecycle handlers serialize their access.

pub mod execution_graph;
pub mod shared;
pub mod workflow_graph;

pub use execution_graph::ExecutionGraph;
pub use shared::SharedExecutionGraph;
pub use workflow_graph::WorkflowGraph;
