//! # Successor Flow Adjuster
//!
//! Skip propagation after a task reaches a terminal outcome. The scheduler
//! loop calls [`SuccessorFlowAdjuster::adjust_successor_flow`] once per
//! completed task, before asking the graph whether downstream tasks are
//! triggerable.
//!
//! The completed task's node must be re-registered on the graph (via
//! `add_node`) with its fresh runtime record before adjustment, since the
//! branch parsers read the recorded result off the graph's stored node.

use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::graph::ExecutionGraph;
use crate::models::TaskNode;

use super::{ConditionSuccessorParser, SuccessorParser, SwitchSuccessorParser};

pub struct SuccessorFlowAdjuster;

impl SuccessorFlowAdjuster {
    /// Adjust the execution graph's skip annotations for one finished task.
    ///
    /// - Skipped task: each successor whose predecessors are now all
    ///   skipped is marked skipped too.
    /// - Forbidden task: no adjustment.
    /// - Condition task: the branch rejected by the recorded outcome is
    ///   marked skipped.
    /// - Switch task: candidate branches other than the one taken are
    ///   marked skipped.
    /// - Anything else: plain DAG edges plus the trigger predicate
    ///   suffice.
    #[instrument(skip(graph, task), fields(run_id = %graph.run_id(), task_name = %task.name))]
    pub fn adjust_successor_flow(graph: &mut ExecutionGraph, task: &TaskNode) -> Result<()> {
        if graph.is_skipped(&task.name) {
            Self::propagate_skip(graph, task)?;
            return Ok(());
        }
        if task.is_forbidden() {
            debug!("Forbidden task needs no successor adjustment");
            return Ok(());
        }
        if task.is_condition() {
            let resolution = ConditionSuccessorParser::new(graph).resolve_successors(task.code)?;
            Self::skip_branches(graph, &resolution.skip);
            return Ok(());
        }
        if task.is_switch() {
            let resolution = SwitchSuccessorParser::new(graph).resolve_successors(task.code)?;
            Self::skip_branches(graph, &resolution.skip);
            return Ok(());
        }
        Ok(())
    }

    /// A skipped task elides each successor whose predecessors are all
    /// skipped
    fn propagate_skip(graph: &mut ExecutionGraph, task: &TaskNode) -> Result<()> {
        for succ in graph.successors(&task.name)? {
            if graph.is_all_predecessors_skipped(&succ)? {
                graph.mark_skipped(&succ);
            }
        }
        Ok(())
    }

    /// Mark each resolved branch task skipped. Codes absent from the
    /// materialized graph are logged and ignored: branch definitions may
    /// reference tasks outside the current sub-graph.
    fn skip_branches(graph: &mut ExecutionGraph, codes: &std::collections::HashSet<i64>) {
        let names: Vec<Option<String>> = codes
            .iter()
            .map(|&code| match graph.task_by_code(code) {
                Ok(node) => Some(node.name.clone()),
                Err(_) => {
                    warn!(task_code = code, "Branch task code not in execution graph; skipping");
                    None
                }
            })
            .collect();
        for name in names.into_iter().flatten() {
            graph.mark_skipped(&name);
        }
    }
}
