#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Flowdag Core
//!
//! In-memory workflow execution graph core for a distributed workflow
//! orchestrator.
//!
//! ## Overview
//!
//! One workflow run is represented by two DAG layers: an immutable
//! definition-level [`graph::WorkflowGraph`] built once per workflow
//! version, and a mutable run-level [`graph::ExecutionGraph`] annotated
//! with per-task runtime state. The crate owns the decision algorithms the
//! scheduler loop needs — which tasks may start, how skip/failure/pause/
//! kill status propagates along dependency chains, and how conditional and
//! switch-style tasks elide branches — and nothing else: task payload
//! execution, persistence, transport, and the scheduler loop itself are
//! external collaborators.
//!
//! ## Module Organization
//!
//! - [`models`] - Task nodes, precedence relations, branch-result payloads
//! - [`graph`] - Definition-level and run-level DAGs
//! - [`traversal`] - Scope-bounded visitors (BFS and topological)
//! - [`flow`] - Branch-aware successor resolution and skip propagation
//! - [`constants`] - Task-type and execution-status enums
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing initialization for embedding binaries/tests
//!
//! ## Quick Start
//!
//! ```rust
//! use flowdag_core::graph::{ExecutionGraph, WorkflowGraph};
//! use flowdag_core::models::{TaskNode, TaskRelation};
//!
//! # fn example() -> flowdag_core::Result<()> {
//! let definition = WorkflowGraph::build(
//!     vec![TaskNode::ordinary("extract", 1), TaskNode::ordinary("load", 2)],
//!     vec![TaskRelation::new("extract", 1, "load", 2)],
//! )?;
//!
//! let mut run = ExecutionGraph::new();
//! for name in definition.task_names() {
//!     run.add_node(definition.task_by_name(name)?.clone());
//!     run.add_edges(name, definition.successors(name)?);
//! }
//!
//! assert!(run.is_trigger_condition_met("extract")?);
//! assert!(!run.is_all_predecessors_skipped("extract")?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Concurrency
//!
//! All graph operations are synchronous and in-memory. Concurrent task
//! lifecycle handlers serialize per run through
//! [`graph::SharedExecutionGraph`]; cross-run parallelism is unrestricted.

pub mod constants;
pub mod error;
pub mod flow;
pub mod graph;
pub mod logging;
pub mod models;
pub mod traversal;

pub use constants::{ExecutionStatus, TaskType};
pub use error::{GraphError, Result};
pub use flow::{SuccessorFlowAdjuster, SuccessorParser, SuccessorResolution};
pub use graph::{ExecutionGraph, SharedExecutionGraph, WorkflowGraph};
pub use models::{ConditionResult, SwitchResult, TaskInstance, TaskNode, TaskRelation};
pub use traversal::{BfsVisitor, DependScope, TopologicalVisitor};
