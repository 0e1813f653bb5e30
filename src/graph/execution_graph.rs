//! # Workflow Execution Graph
//!
//! Mutable run-level DAG for one workflow instance. Topology is registered
//! incrementally (node by node, edge batch by edge batch) so the
//! orchestrator can materialize partial graphs for restart-from-node and
//! sub-process runs. Runtime state lives in per-task annotation sets:
//!
//! - `active`: tasks currently being handled by the scheduler loop
//! - `skipped`: branch-elided tasks; membership is monotonic
//! - `failed_chain` / `paused_chain` / `killed_chain`: the chain through
//!   this task reached that terminal outcome; membership is monotonic
//!
//! A task absent from every set after having been active finished
//! successfully. The three `mark_chain_*` operations assert the task's
//! externally-recorded status matches before marking, guarding against
//! races between persistence and graph state.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use crate::constants::ExecutionStatus;
use crate::error::{GraphError, Result};
use crate::models::TaskNode;

#[derive(Debug)]
pub struct ExecutionGraph {
    run_id: Uuid,
    nodes: HashMap<String, TaskNode>,
    code_index: HashMap<i64, String>,
    predecessors: HashMap<String, HashSet<String>>,
    successors: HashMap<String, HashSet<String>>,
    active: HashSet<String>,
    skipped: HashSet<String>,
    failed_chain: HashSet<String>,
    paused_chain: HashSet<String>,
    killed_chain: HashSet<String>,
}

impl ExecutionGraph {
    /// Create an empty graph for a new workflow run
    pub fn new() -> Self {
        Self::with_run_id(Uuid::new_v4())
    }

    /// Create an empty graph tied to an existing run identity
    pub fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            nodes: HashMap::new(),
            code_index: HashMap::new(),
            predecessors: HashMap::new(),
            successors: HashMap::new(),
            active: HashSet::new(),
            skipped: HashSet::new(),
            failed_chain: HashSet::new(),
            paused_chain: HashSet::new(),
            killed_chain: HashSet::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Register a task node, initializing empty adjacency entries.
    ///
    /// Re-adding an existing name refreshes the stored node (the
    /// orchestrator re-registers tasks to update their runtime records).
    pub fn add_node(&mut self, task: TaskNode) {
        self.predecessors.entry(task.name.clone()).or_default();
        self.successors.entry(task.name.clone()).or_default();
        self.code_index.insert(task.code, task.name.clone());
        self.nodes.insert(task.name.clone(), task);
    }

    /// Register a batch of downstream edges from one upstream task.
    ///
    /// Downstream names may reference tasks not yet added; only their
    /// predecessor bookkeeping is touched here, and both sides must be
    /// registered before adjacency queries are trusted.
    pub fn add_edges(&mut self, pre: &str, posts: impl IntoIterator<Item = String>) {
        for post in posts {
            self.successors
                .entry(pre.to_string())
                .or_default()
                .insert(post.clone());
            self.predecessors
                .entry(post)
                .or_default()
                .insert(pre.to_string());
        }
        self.predecessors.entry(pre.to_string()).or_default();
    }

    /// Add a task to the active set; returns whether this is a new
    /// membership
    pub fn mark_active(&mut self, name: &str) -> bool {
        let inserted = self.active.insert(name.to_string());
        if inserted {
            debug!(run_id = %self.run_id, task_name = name, "Task marked active");
        }
        inserted
    }

    /// Remove a task from the active set (called on completion, before any
    /// terminal-chain marking)
    pub fn mark_inactive(&mut self, name: &str) {
        if self.active.remove(name) {
            debug!(run_id = %self.run_id, task_name = name, "Task marked inactive");
        }
    }

    /// Mark the chain through this task failed.
    ///
    /// The task's externally-recorded status must already be `Failure`,
    /// else the orchestrator is out of sync with persisted state.
    pub fn mark_chain_failure(&mut self, task: &TaskNode) -> Result<()> {
        self.mark_chain(task, ExecutionStatus::Failure)
    }

    /// Mark the chain through this task paused; recorded status must be
    /// `Pause`
    pub fn mark_chain_paused(&mut self, task: &TaskNode) -> Result<()> {
        self.mark_chain(task, ExecutionStatus::Pause)
    }

    /// Mark the chain through this task killed; recorded status must be
    /// `Kill`
    pub fn mark_chain_killed(&mut self, task: &TaskNode) -> Result<()> {
        self.mark_chain(task, ExecutionStatus::Kill)
    }

    fn mark_chain(&mut self, task: &TaskNode, expected: ExecutionStatus) -> Result<()> {
        let actual = task.status();
        if actual != Some(expected) {
            return Err(GraphError::inconsistent_state(
                &task.name,
                expected,
                actual.map_or_else(|| "none".to_string(), |s| s.to_string()),
            ));
        }
        let set = match expected {
            ExecutionStatus::Failure => &mut self.failed_chain,
            ExecutionStatus::Pause => &mut self.paused_chain,
            ExecutionStatus::Kill => &mut self.killed_chain,
            _ => unreachable!("mark_chain is only called with terminal chain statuses"),
        };
        set.insert(task.name.clone());
        debug!(
            run_id = %self.run_id,
            task_name = %task.name,
            status = %expected,
            "Task chain marked terminal"
        );
        Ok(())
    }

    /// Idempotent, monotonic add to the skipped set
    pub fn mark_skipped(&mut self, name: &str) {
        if self.skipped.insert(name.to_string()) {
            debug!(run_id = %self.run_id, task_name = name, "Task marked skipped");
        }
    }

    /// True iff every predecessor has left the active set and sits in none
    /// of the three terminal-chain sets. A task with zero predecessors
    /// trivially satisfies this (start node).
    pub fn is_trigger_condition_met(&self, name: &str) -> Result<bool> {
        let preds = self.predecessor_set(name)?;
        Ok(preds.iter().all(|pred| {
            !self.active.contains(pred)
                && !self.failed_chain.contains(pred)
                && !self.paused_chain.contains(pred)
                && !self.killed_chain.contains(pred)
        }))
    }

    /// True iff the task has predecessors and every one of them is
    /// skipped. Deliberately false for zero predecessors: a start node is
    /// never elided just because "all" of its empty predecessor set is.
    pub fn is_all_predecessors_skipped(&self, name: &str) -> Result<bool> {
        let preds = self.predecessor_set(name)?;
        if preds.is_empty() {
            return Ok(false);
        }
        Ok(preds.iter().all(|pred| self.skipped.contains(pred)))
    }

    /// True iff the task has no successors, or its chain is killed, or its
    /// chain is paused. A failed chain alone does not end the chain.
    pub fn is_end_of_task_chain(&self, name: &str) -> Result<bool> {
        let succs = self.successor_set(name)?;
        Ok(succs.is_empty()
            || self.killed_chain.contains(name)
            || self.paused_chain.contains(name))
    }

    /// True iff the task has successors and each one is either skipped or
    /// the task itself is of CONDITION type.
    ///
    /// The self-type check reproduces the literal upstream rule; see the
    /// open-question note in DESIGN.md before changing it.
    pub fn is_all_successors_are_condition_task(&self, name: &str) -> Result<bool> {
        let succs = self.successor_set(name)?;
        if succs.is_empty() {
            return Ok(false);
        }
        let task = self.task_by_name(name)?;
        Ok(succs
            .iter()
            .all(|succ| self.skipped.contains(succ) || task.is_condition()))
    }

    /// True iff no task is active
    pub fn is_all_finished(&self) -> bool {
        self.active.is_empty()
    }

    /// True iff all tasks finished and no chain reached a terminal outcome
    pub fn is_all_success(&self) -> bool {
        self.is_all_finished()
            && self.failed_chain.is_empty()
            && self.paused_chain.is_empty()
            && self.killed_chain.is_empty()
    }

    pub fn exists_failed(&self) -> bool {
        !self.failed_chain.is_empty()
    }

    pub fn exists_paused(&self) -> bool {
        !self.paused_chain.is_empty()
    }

    pub fn exists_killed(&self) -> bool {
        !self.killed_chain.is_empty()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skipped.contains(name)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn skipped_tasks(&self) -> &HashSet<String> {
        &self.skipped
    }

    pub fn failed_chain_tasks(&self) -> &HashSet<String> {
        &self.failed_chain
    }

    pub fn paused_chain_tasks(&self) -> &HashSet<String> {
        &self.paused_chain
    }

    pub fn killed_chain_tasks(&self) -> &HashSet<String> {
        &self.killed_chain
    }

    pub fn task_by_name(&self, name: &str) -> Result<&TaskNode> {
        self.nodes
            .get(name)
            .ok_or_else(|| GraphError::task_not_found(name))
    }

    pub fn task_by_code(&self, code: i64) -> Result<&TaskNode> {
        self.code_index
            .get(&code)
            .and_then(|name| self.nodes.get(name))
            .ok_or_else(|| GraphError::task_code_not_found(code))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Defensive copy of a task's predecessor set
    pub fn predecessors(&self, name: &str) -> Result<HashSet<String>> {
        self.predecessor_set(name).cloned()
    }

    /// Defensive copy of a task's successor set
    pub fn successors(&self, name: &str) -> Result<HashSet<String>> {
        self.successor_set(name).cloned()
    }

    fn predecessor_set(&self, name: &str) -> Result<&HashSet<String>> {
        self.predecessors
            .get(name)
            .ok_or_else(|| GraphError::task_not_found(name))
    }

    fn successor_set(&self, name: &str) -> Result<&HashSet<String>> {
        self.successors
            .get(name)
            .ok_or_else(|| GraphError::task_not_found(name))
    }
}

impl Default for ExecutionGraph {
    fn default() -> Self {
        Self::new()
    }
}
