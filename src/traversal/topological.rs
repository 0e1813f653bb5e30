//! # Topological Visitor
//!
//! Kahn's algorithm over the *entire* workflow graph, invoking the visit
//! callback only for scope members. The whole-graph ordering guarantees
//! that when a member is visited, all of its predecessors in the full
//! graph have already been dequeued — the orchestrator relies on this to
//! build runnable-task records with resolved predecessor references in
//! dependency order.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{compute_closure, DependScope};
use crate::error::{GraphError, Result};
use crate::graph::WorkflowGraph;

pub struct TopologicalVisitor<'g, F> {
    graph: &'g WorkflowGraph,
    scope: DependScope,
    start_nodes: Vec<String>,
    visit: F,
}

impl<'g, F> TopologicalVisitor<'g, F>
where
    F: FnMut(&str, &HashSet<String>),
{
    pub fn builder() -> TopologicalVisitorBuilder<'g, F> {
        TopologicalVisitorBuilder::new()
    }

    /// Visit every scope member exactly once, in whole-graph dependency
    /// order
    pub fn traverse(mut self) -> Result<()> {
        let scope_set = self.compute_scope()?;
        debug!(
            scope = ?self.scope,
            member_count = scope_set.len(),
            "Topological traversal starting"
        );

        // In-degree over the entire graph, not just the scope
        let mut in_degree: HashMap<String, usize> = HashMap::new();
        for name in self.graph.task_names() {
            in_degree.insert(name.to_string(), self.graph.predecessors(name)?.len());
        }

        let mut queue: VecDeque<String> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(name, _)| name.clone())
            .collect();

        while let Some(name) = queue.pop_front() {
            let successors = self.graph.successors(&name)?;
            if scope_set.contains(&name) {
                let in_scope = self.in_scope_successors(&successors, &scope_set);
                (self.visit)(&name, &in_scope);
            }
            for succ in successors {
                let deg = in_degree.get_mut(&succ).expect("known node");
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(succ);
                }
            }
        }
        Ok(())
    }

    fn compute_scope(&self) -> Result<HashSet<String>> {
        match self.scope {
            DependScope::SelfOnly => {
                let mut set = HashSet::new();
                for start in &self.start_nodes {
                    self.graph.task_by_name(start)?;
                    set.insert(start.clone());
                }
                Ok(set)
            }
            DependScope::UpstreamClosure => {
                compute_closure(self.graph, &self.start_nodes, true)
            }
            DependScope::DownstreamClosure => {
                compute_closure(self.graph, &self.start_nodes, false)
            }
        }
    }

    /// Downstream scope passes successors through unfiltered; the other
    /// scopes filter to membership, mirroring the BFS variant's asymmetry
    fn in_scope_successors(
        &self,
        successors: &HashSet<String>,
        scope_set: &HashSet<String>,
    ) -> HashSet<String> {
        match self.scope {
            DependScope::DownstreamClosure => successors.clone(),
            DependScope::SelfOnly | DependScope::UpstreamClosure => successors
                .iter()
                .filter(|succ| scope_set.contains(*succ))
                .cloned()
                .collect(),
        }
    }
}

pub struct TopologicalVisitorBuilder<'g, F> {
    graph: Option<&'g WorkflowGraph>,
    scope: DependScope,
    start_nodes: Option<Vec<String>>,
    visit: Option<F>,
}

impl<'g, F> TopologicalVisitorBuilder<'g, F>
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

    pub fn build(self) -> Result<TopologicalVisitor<'g, F>> {
        let graph = self
            .graph
            .ok_or(GraphError::BuilderIncomplete { missing: "graph" })?;
        let visit = self
            .visit
            .ok_or(GraphError::BuilderIncomplete { missing: "visit" })?;
        let start_nodes = self.start_nodes.unwrap_or_else(|| graph.start_nodes());
        Ok(TopologicalVisitor {
            graph,
            scope: self.scope,
            start_nodes,
            visit,
        })
    }
}

impl<'g, F> Default for TopologicalVisitorBuilder<'g, F>
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

    fn visit_order(graph: &WorkflowGraph, scope: DependScope, starts: Vec<String>) -> Vec<String> {
        let mut order = Vec::new();
        TopologicalVisitor::builder()
            .graph(graph)
            .scope(scope)
            .start_nodes(starts)
            .visit(|name: &str, _succs: &HashSet<String>| order.push(name.to_string()))
            .build()
            .unwrap()
            .traverse()
            .unwrap();
        order
    }

    #[test]
    fn test_join_node_visited_after_all_branches() {
        let graph = diamond();
        let order = visit_order(
            &graph,
            DependScope::DownstreamClosure,
            vec!["a".to_string()],
        );
        let pos = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert_eq!(order.len(), 4);
        assert!(pos("d") > pos("b"));
        assert!(pos("d") > pos("c"));
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
    }

    #[test]
    fn test_scope_members_only_but_full_graph_ordering() {
        // side -> b: outside the downstream closure of {b}, but b's
        // in-degree still counts it, so ordering holds graph-wide
        let graph = WorkflowGraph::build(
            vec![
                TaskNode::ordinary("a", 1),
                TaskNode::ordinary("side", 2),
                TaskNode::ordinary("b", 3),
                TaskNode::ordinary("c", 4),
            ],
            vec![
                TaskRelation::new("a", 1, "b", 3),
                TaskRelation::new("side", 2, "b", 3),
                TaskRelation::new("b", 3, "c", 4),
            ],
        )
        .unwrap();

        let order = visit_order(
            &graph,
            DependScope::DownstreamClosure,
            vec!["b".to_string()],
        );
        assert_eq!(order, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_self_only_scope() {
        let graph = diamond();
        let mut seen = Vec::new();
        let mut succs_of_a = HashSet::new();
        TopologicalVisitor::builder()
            .graph(&graph)
            .scope(DependScope::SelfOnly)
            .start_nodes(vec!["a".to_string(), "b".to_string()])
            .visit(|name: &str, succs: &HashSet<String>| {
                seen.push(name.to_string());
                if name == "a" {
                    succs_of_a = succs.clone();
                }
            })
            .build()
            .unwrap()
            .traverse()
            .unwrap();
        assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
        // Successors filtered to scope membership
        assert_eq!(succs_of_a, HashSet::from(["b".to_string()]));
    }

    #[test]
    fn test_upstream_scope_in_dependency_order() {
        let graph = diamond();
        let order = visit_order(&graph, DependScope::UpstreamClosure, vec!["d".to_string()]);
        let pos = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert_eq!(order.len(), 4);
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("d") > pos("b"));
        assert!(pos("d") > pos("c"));
    }
}
