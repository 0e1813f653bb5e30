//! # Successor Flow
//!
//! Branch-aware successor resolution. After a task reaches a terminal
//! outcome the scheduler loop calls
//! [`SuccessorFlowAdjuster::adjust_successor_flow`], which propagates skip
//! state through the execution graph according to the task's type and its
//! recorded branch result. The [`SuccessorParser`] trait keeps the
//! adjuster decoupled from any single branch-task implementation.

pub mod successor_adjuster;
pub mod successor_parser;

pub use successor_adjuster::SuccessorFlowAdjuster;
pub use successor_parser::{
    ConditionSuccessorParser, SuccessorParser, SuccessorResolution, SwitchSuccessorParser,
};
