//! # Successor Parser
//!
//! Generalized interface for task types whose effective successors go
//! beyond static DAG edges. Given a task code, a parser returns the task
//! codes to actually trigger and the branch codes to mark skipped, derived
//! from the task's recorded result payload.

use std::collections::HashSet;

use crate::error::Result;
use crate::graph::ExecutionGraph;
use crate::models::{ConditionResult, SwitchResult};

/// Effective-successor resolution for one branch task
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuccessorResolution {
    /// Task codes the branch actually triggers
    pub trigger: HashSet<i64>,
    /// Task codes of branches to mark skipped
    pub skip: HashSet<i64>,
}

pub trait SuccessorParser {
    /// Resolve effective successors for the task identified by `task_code`
    fn resolve_successors(&self, task_code: i64) -> Result<SuccessorResolution>;
}

/// Resolves CONDITION tasks: the recorded result names a success branch
/// and a fail branch; whichever the condition outcome rejects is skipped.
pub struct ConditionSuccessorParser<'g> {
    graph: &'g ExecutionGraph,
}

impl<'g> ConditionSuccessorParser<'g> {
    pub fn new(graph: &'g ExecutionGraph) -> Self {
        Self { graph }
    }
}

impl SuccessorParser for ConditionSuccessorParser<'_> {
    fn resolve_successors(&self, task_code: i64) -> Result<SuccessorResolution> {
        let task = self.graph.task_by_code(task_code)?;
        let result = ConditionResult::from_task(task)?;
        Ok(SuccessorResolution {
            trigger: result.trigger_nodes().iter().copied().collect(),
            skip: result.skip_nodes().iter().copied().collect(),
        })
    }
}

/// Resolves SWITCH tasks: candidate branches minus the branch actually
/// taken are skipped.
pub struct SwitchSuccessorParser<'g> {
    graph: &'g ExecutionGraph,
}

impl<'g> SwitchSuccessorParser<'g> {
    pub fn new(graph: &'g ExecutionGraph) -> Self {
        Self { graph }
    }
}

impl SuccessorParser for SwitchSuccessorParser<'_> {
    fn resolve_successors(&self, task_code: i64) -> Result<SuccessorResolution> {
        let task = self.graph.task_by_code(task_code)?;
        let result = SwitchResult::from_task(task)?;
        Ok(SuccessorResolution {
            trigger: HashSet::from([result.next_node]),
            skip: result.skip_nodes().into_iter().collect(),
        })
    }
}
