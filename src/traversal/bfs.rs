//! # BFS Visitor
//!
//! Plain breadth-first visitor. Members are visited in discovery order.
//! The two closure scopes are intentionally asymmetric: downstream
//! membership implies every successor is relevant, so successors pass
//! through unfiltered and visiting happens while discovering; upstream
//! membership does not, so the ancestor closure is computed first and each
//! member's successors are filtered to the closure before its visit.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::{compute_closure, DependScope};
use crate::error::{GraphError, Result};
use crate::graph::WorkflowGraph;

pub struct BfsVisitor<'g, F> {
    graph: &'g WorkflowGraph,
    scope: DependScope,
    start_nodes: Vec<String>,
    visit: F,
}

impl<'g, F> BfsVisitor<'g, F>
where
    F: FnMut(&str, &HashSet<String>),
{
    pub fn builder() -> BfsVisitorBuilder<'g, F> {
        BfsVisitorBuilder::new()
    }

    /// Visit every task in the configured scope exactly once
    pub fn traverse(mut self) -> Result<()> {
        debug!(
            scope = ?self.scope,
            start_count = self.start_nodes.len(),
            "BFS traversal starting"
        );
        match self.scope {
            DependScope::SelfOnly => self.traverse_self_only(),
            DependScope::DownstreamClosure => self.traverse_downstream(),
            DependScope::UpstreamClosure => self.traverse_upstream(),
        }
    }

    /// Visit only the start nodes, successors filtered to start-set
    /// membership
    fn traverse_self_only(&mut self) -> Result<()> {
        let start_set: HashSet<String> = self.start_nodes.iter().cloned().collect();
        let starts = self.start_nodes.clone();
        for name in &starts {
            let successors: HashSet<String> = self
                .graph
                .successors(name)?
                .into_iter()
                .filter(|succ| start_set.contains(succ))
                .collect();
            (self.visit)(name, &successors);
        }
        Ok(())
    }

    /// Visit while discovering; every successor of a member is itself a
    /// member, so the successor set passes through unfiltered
    fn traverse_downstream(&mut self) -> Result<()> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for start in &self.start_nodes {
            self.graph.task_by_name(start)?;
            if seen.insert(start.clone()) {
                queue.push_back(start.clone());
            }
        }

        while let Some(name) = queue.pop_front() {
            let successors = self.graph.successors(&name)?;
            for succ in &successors {
                if seen.insert(succ.clone()) {
                    queue.push_back(succ.clone());
                }
            }
            (self.visit)(&name, &successors);
        }
        Ok(())
    }

    /// Closure first, then visits: an ancestor's unfiltered successors may
    /// lie outside the closure, so each visit gets the filtered set
    fn traverse_upstream(&mut self) -> Result<()> {
        let closure = compute_closure(self.graph, &self.start_nodes, true)?;

        // Re-walk in discovery order now that membership is settled
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for start in &self.start_nodes {
            if seen.insert(start.clone()) {
                queue.push_back(start.clone());
            }
        }
        while let Some(name) = queue.pop_front() {
            let successors: HashSet<String> = self
                .graph
                .successors(&name)?
                .into_iter()
                .filter(|succ| closure.contains(succ))
                .collect();
            (self.visit)(&name, &successors);
            for pred in self.graph.predecessors(&name)? {
                if seen.insert(pred.clone()) {
                    queue.push_back(pred);
                }
            }
        }
        Ok(())
    }
}

pub struct BfsVisitorBuilder<'g, F> {
    graph: Option<&'g WorkflowGraph>,
    scope: DependScope,
    start_nodes: Option<Vec<String>>,
    visit: Option<F>,
}

impl<'g, F> BfsVisitorBuilder<'g, F>
where
    F: FnMut(&str, &HashSet<String>),
{
    pub fn new() -> Self {
        Self {
            graph: None,
            scope: DependScope::DownstreamClosure,
            start_nodes: None,
            visit: None,
        }
    }

    pub fn graph(mut self, graph: &'g WorkflowGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn scope(mut self, scope: DependScope) -> Self {
        self.scope = scope;
        self
    }

    /// Explicit start-node list; defaults to the graph's natural start
    /// nodes
    pub fn start_nodes(mut self, start_nodes: Vec<String>) -> Self {
        self.start_nodes = Some(start_nodes);
        self
    }

    pub fn visit(mut self, visit: F) -> Self {
        self.visit = Some(visit);
        self
    }

    pub fn build(self) -> Result<BfsVisitor<'g, F>> {
        let graph = self
            .graph
            .ok_or(GraphError::BuilderIncomplete { missing: "graph" })?;
        let visit = self
            .visit
            .ok_or(GraphError::BuilderIncomplete { missing: "visit" })?;
        let start_nodes = self.start_nodes.unwrap_or_else(|| graph.start_nodes());
        Ok(BfsVisitor {
            graph,
            scope: self.scope,
            start_nodes,
            visit,
        })
    }
}

impl<'g, F> Default for BfsVisitorBuilder<'g, F>
where
    F: FnMut(&str, &HashSet<String>),
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskNode, TaskRelation};
    use std::collections::HashMap;

    fn diamond() -> WorkflowGraph {
        WorkflowGraph::build(
            vec![
                TaskNode::ordinary("a", 1),
                TaskNode::ordinary("b", 2),
                TaskNode::ordinary("c", 3),
                TaskNode::ordinary("d", 4),
            ],
            vec![
                TaskRelation::new("a", 1, "b", 2),
                TaskRelation::new("a", 1, "c", 3),
                TaskRelation::new("b", 2, "d", 4),
                TaskRelation::new("c", 3, "d", 4),
            ],
        )
        .unwrap()
    }

    fn collect_visits(
        graph: &WorkflowGraph,
        scope: DependScope,
        starts: Option<Vec<String>>,
    ) -> (Vec<String>, HashMap<String, HashSet<String>>) {
        let mut order = Vec::new();
        let mut successors = HashMap::new();
        let mut builder = BfsVisitor::builder().graph(graph).scope(scope).visit(
            |name: &str, succs: &HashSet<String>| {
                order.push(name.to_string());
                successors.insert(name.to_string(), succs.clone());
            },
        );
        if let Some(starts) = starts {
            builder = builder.start_nodes(starts);
        }
        builder.build().unwrap().traverse().unwrap();
        (order, successors)
    }

    #[test]
    fn test_builder_requires_graph_and_callback() {
        let graph = diamond();
        let missing_visit: BfsVisitorBuilder<'_, fn(&str, &HashSet<String>)> =
            BfsVisitorBuilder::new().graph(&graph);
        assert!(matches!(
            missing_visit.build(),
            Err(GraphError::BuilderIncomplete { missing: "visit" })
        ));

        let missing_graph: BfsVisitorBuilder<'_, fn(&str, &HashSet<String>)> =
            BfsVisitorBuilder::new().visit(|_, _| {});
        assert!(matches!(
            missing_graph.build(),
            Err(GraphError::BuilderIncomplete { missing: "graph" })
        ));
    }

    #[test]
    fn test_self_only_visits_start_set_with_membership_filter() {
        let graph = diamond();
        let (order, succs) = collect_visits(
            &graph,
            DependScope::SelfOnly,
            Some(vec!["a".to_string(), "b".to_string()]),
        );
        assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
        // "b" is in the start set so it survives the filter; "c" is not
        assert_eq!(succs["a"], HashSet::from(["b".to_string()]));
        assert_eq!(succs["b"], HashSet::new());
    }

    #[test]
    fn test_downstream_closure_visits_descendants_unfiltered() {
        let graph = diamond();
        let (order, succs) =
            collect_visits(&graph, DependScope::DownstreamClosure, Some(vec!["b".to_string()]));
        assert_eq!(order, vec!["b".to_string(), "d".to_string()]);
        assert_eq!(succs["b"], HashSet::from(["d".to_string()]));
        assert_eq!(succs["d"], HashSet::new());
    }

    #[test]
    fn test_downstream_defaults_to_natural_start_nodes() {
        let graph = diamond();
        let (order, _) = collect_visits(&graph, DependScope::DownstreamClosure, None);
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], "a");
        // d is discovered last in every BFS ordering of the diamond
        assert_eq!(order[3], "d");
    }

    #[test]
    fn test_upstream_closure_filters_successors_to_closure() {
        let graph = WorkflowGraph::build(
            vec![
                TaskNode::ordinary("a", 1),
                TaskNode::ordinary("b", 2),
                TaskNode::ordinary("c", 3),
                TaskNode::ordinary("side", 4),
            ],
            vec![
                TaskRelation::new("a", 1, "b", 2),
                TaskRelation::new("b", 2, "c", 3),
                TaskRelation::new("a", 1, "side", 4),
            ],
        )
        .unwrap();

        let (order, succs) =
            collect_visits(&graph, DependScope::UpstreamClosure, Some(vec!["c".to_string()]));
        let visited: HashSet<String> = order.iter().cloned().collect();
        assert_eq!(
            visited,
            HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
        // "side" is a successor of "a" but outside the ancestor closure
        assert_eq!(succs["a"], HashSet::from(["b".to_string()]));
        assert_eq!(succs["b"], HashSet::from(["c".to_string()]));
    }
}
