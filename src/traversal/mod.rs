//! # Graph Traversal Visitors
//!
//! Two interchangeable algorithms that compute a bounded sub-graph of a
//! [`WorkflowGraph`](crate::graph::WorkflowGraph) reachable from a start
//! set under a dependency scope, and visit each member with its in-scope
//! successor set. The orchestrator uses them at workflow start/resume to
//! decide which subset of the definition to materialize into the
//! execution graph ("only this node", "everything upstream", "everything
//! downstream").
//!
//! - [`BfsVisitor`]: visits in discovery order; computes the downstream
//!   closure eagerly (visiting while discovering) and the upstream closure
//!   lazily (closure first, then visits with closure-filtered successors).
//! - [`TopologicalVisitor`]: runs Kahn's algorithm over the entire graph
//!   and invokes the callback only for scope members, so a member is
//!   visited only after all of its full-graph predecessors dequeue.

pub mod bfs;
pub mod topological;

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::system;
use crate::error::Result;
use crate::graph::WorkflowGraph;

pub use bfs::{BfsVisitor, BfsVisitorBuilder};
pub use topological::{TopologicalVisitor, TopologicalVisitorBuilder};

/// Which sub-graph a visitor materializes relative to its start set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependScope {
    /// Only the start nodes themselves
    SelfOnly,
    /// The start nodes plus every ancestor
    UpstreamClosure,
    /// The start nodes plus every descendant
    DownstreamClosure,
}

/// BFS closure over predecessors (upstream) or successors (downstream)
/// from the start set, start nodes included.
pub(crate) fn compute_closure(
    graph: &WorkflowGraph,
    starts: &[String],
    upstream: bool,
) -> Result<HashSet<String>> {
    let mut closure: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    for start in starts {
        // Fails NotFound for unregistered start nodes
        graph.task_by_name(start)?;
        if closure.insert(start.clone()) {
            queue.push_back((start.clone(), 0));
        }
    }

    while let Some((name, depth)) = queue.pop_front() {
        if depth >= system::MAX_DEPENDENCY_DEPTH {
            warn!(
                task_name = %name,
                depth = depth,
                "Closure traversal exceeded the expected dependency depth"
            );
        }
        let neighbors = if upstream {
            graph.predecessors(&name)?
        } else {
            graph.successors(&name)?
        };
        for neighbor in neighbors {
            if closure.insert(neighbor.clone()) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }
    Ok(closure)
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

    #[test]
    fn test_downstream_closure() {
        let graph = diamond();
        let closure = compute_closure(&graph, &["b".to_string()], false).unwrap();
        assert_eq!(closure, HashSet::from(["b".to_string(), "d".to_string()]));
    }

    #[test]
    fn test_upstream_closure() {
        let graph = diamond();
        let closure = compute_closure(&graph, &["d".to_string()], true).unwrap();
        assert_eq!(
            closure,
            HashSet::from([
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string()
            ])
        );
    }

    #[test]
    fn test_unknown_start_node_fails() {
        let graph = diamond();
        assert!(compute_closure(&graph, &["ghost".to_string()], false).is_err());
    }
}
