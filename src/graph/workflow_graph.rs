//! # Workflow Graph
//!
//! Immutable definition-level DAG for one workflow version. Built in a
//! single shot from a task list plus precedence relations, validated at
//! construction (duplicate nodes/edges, dangling or non-positive relation
//! endpoints, cycles), and read-only thereafter.
//!
//! Keyed primarily by task name; a secondary code index resolves the
//! version-stable numeric codes that precedence relations and branch
//! results reference.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::constants::system;
use crate::error::{GraphError, Result};
use crate::models::{TaskNode, TaskRelation};

#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    nodes: HashMap<String, TaskNode>,
    code_index: HashMap<i64, String>,
    predecessors: HashMap<String, HashSet<String>>,
    successors: HashMap<String, HashSet<String>>,
    edge_count: usize,
}

impl WorkflowGraph {
    /// Build the definition DAG from tasks and precedence relations.
    ///
    /// Validation: node names must be unique; every relation endpoint must
    /// name a registered task; a relation whose endpoint codes are both
    /// non-positive is invalid; directed edges must be unique; the result
    /// must be acyclic.
    pub fn build(tasks: Vec<TaskNode>, relations: Vec<TaskRelation>) -> Result<Self> {
        if tasks.len() > system::MAX_WORKFLOW_TASKS {
            warn!(
                task_count = tasks.len(),
                limit = system::MAX_WORKFLOW_TASKS,
                "Workflow definition exceeds the recommended task limit"
            );
        }

        let mut graph = Self {
            nodes: HashMap::with_capacity(tasks.len()),
            code_index: HashMap::with_capacity(tasks.len()),
            predecessors: HashMap::with_capacity(tasks.len()),
            successors: HashMap::with_capacity(tasks.len()),
            edge_count: 0,
        };

        for task in tasks {
            graph.add_node(task)?;
        }
        for relation in &relations {
            graph.add_edge(relation)?;
        }
        graph.assert_acyclic()?;

        debug!(
            node_count = graph.nodes.len(),
            edge_count = graph.edge_count,
            "Built workflow graph"
        );
        Ok(graph)
    }

    fn add_node(&mut self, task: TaskNode) -> Result<()> {
        if self.nodes.contains_key(&task.name) {
            return Err(GraphError::DuplicateNode { name: task.name });
        }
        self.predecessors.insert(task.name.clone(), HashSet::new());
        self.successors.insert(task.name.clone(), HashSet::new());
        self.code_index.insert(task.code, task.name.clone());
        self.nodes.insert(task.name.clone(), task);
        Ok(())
    }

    fn add_edge(&mut self, relation: &TaskRelation) -> Result<()> {
        relation.validate()?;

        let pre = &relation.pre_task_name;
        let post = &relation.post_task_name;
        if !self.nodes.contains_key(pre) {
            return Err(GraphError::DanglingRelation { name: pre.clone() });
        }
        if !self.nodes.contains_key(post) {
            return Err(GraphError::DanglingRelation { name: post.clone() });
        }

        let inserted = self
            .successors
            .get_mut(pre)
            .map(|set| set.insert(post.clone()))
            .unwrap_or(false);
        if !inserted {
            return Err(GraphError::DuplicateEdge {
                pre: pre.clone(),
                post: post.clone(),
            });
        }
        if let Some(set) = self.predecessors.get_mut(post) {
            set.insert(pre.clone());
        }
        self.edge_count += 1;
        Ok(())
    }

    /// Kahn in-degree exhaustion; nodes left undrained sit on a cycle.
    fn assert_acyclic(&self) -> Result<()> {
        let mut in_degree: HashMap<&str, usize> = self
            .nodes
            .keys()
            .map(|name| (name.as_str(), self.predecessors[name].len()))
            .collect();

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&name, _)| name)
            .collect();

        let mut drained = 0usize;
        while let Some(name) = queue.pop_front() {
            drained += 1;
            for succ in &self.successors[name] {
                let deg = in_degree.get_mut(succ.as_str()).expect("known node");
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(succ.as_str());
                }
            }
        }

        let remaining = self.nodes.len() - drained;
        if remaining > 0 {
            return Err(GraphError::CycleDetected { remaining });
        }
        Ok(())
    }

    /// Names of all tasks with no predecessors
    pub fn start_nodes(&self) -> Vec<String> {
        let mut starts: Vec<String> = self
            .predecessors
            .iter()
            .filter(|(_, preds)| preds.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        starts.sort();
        starts
    }

    /// Defensive copy of a task's predecessor set
    pub fn predecessors(&self, name: &str) -> Result<HashSet<String>> {
        self.predecessors
            .get(name)
            .cloned()
            .ok_or_else(|| GraphError::task_not_found(name))
    }

    /// Defensive copy of a task's successor set
    pub fn successors(&self, name: &str) -> Result<HashSet<String>> {
        self.successors
            .get(name)
            .cloned()
            .ok_or_else(|| GraphError::task_not_found(name))
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

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate all task names
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Re-derive the precedence relations from the adjacency maps.
    ///
    /// Produces exactly the relation set the graph was built from (no
    /// duplicates, no omissions), which external persistence layers use to
    /// round-trip a definition.
    pub fn relations(&self) -> Vec<TaskRelation> {
        let mut relations: Vec<TaskRelation> = self
            .successors
            .iter()
            .flat_map(|(pre, posts)| {
                posts.iter().map(move |post| {
                    TaskRelation::new(
                        pre.clone(),
                        self.nodes[pre].code,
                        post.clone(),
                        self.nodes[post].code,
                    )
                })
            })
            .collect();
        relations.sort_by(|a, b| {
            (&a.pre_task_name, &a.post_task_name).cmp(&(&b.pre_task_name, &b.post_task_name))
        });
        relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TaskType;

    fn relation(pre: (&str, i64), post: (&str, i64)) -> TaskRelation {
        TaskRelation::new(pre.0, pre.1, post.0, post.1)
    }

    fn diamond() -> WorkflowGraph {
        WorkflowGraph::build(
            vec![
                TaskNode::ordinary("a", 1),
                TaskNode::ordinary("b", 2),
                TaskNode::ordinary("c", 3),
                TaskNode::ordinary("d", 4),
            ],
            vec![
                relation(("a", 1), ("b", 2)),
                relation(("a", 1), ("c", 3)),
                relation(("b", 2), ("d", 4)),
                relation(("c", 3), ("d", 4)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_start_nodes_are_the_predecessor_free_set() {
        let graph = diamond();
        assert_eq!(graph.start_nodes(), vec!["a".to_string()]);

        let two_roots = WorkflowGraph::build(
            vec![
                TaskNode::ordinary("x", 1),
                TaskNode::ordinary("y", 2),
                TaskNode::ordinary("z", 3),
            ],
            vec![relation(("x", 1), ("z", 3)), relation(("y", 2), ("z", 3))],
        )
        .unwrap();
        assert_eq!(two_roots.start_nodes(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_adjacency_lookups() {
        let graph = diamond();
        assert_eq!(
            graph.successors("a").unwrap(),
            HashSet::from(["b".to_string(), "c".to_string()])
        );
        assert_eq!(
            graph.predecessors("d").unwrap(),
            HashSet::from(["b".to_string(), "c".to_string()])
        );
        assert!(matches!(
            graph.successors("nope"),
            Err(GraphError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn test_code_lookup() {
        let graph = diamond();
        assert_eq!(graph.task_by_code(3).unwrap().name, "c");
        assert!(matches!(
            graph.task_by_code(99),
            Err(GraphError::TaskCodeNotFound { code: 99 })
        ));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let err = WorkflowGraph::build(
            vec![TaskNode::ordinary("a", 1), TaskNode::ordinary("a", 2)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode { .. }));
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let err = WorkflowGraph::build(
            vec![TaskNode::ordinary("a", 1), TaskNode::ordinary("b", 2)],
            vec![relation(("a", 1), ("b", 2)), relation(("a", 1), ("b", 2))],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateEdge { .. }));
    }

    #[test]
    fn test_dangling_relation_rejected() {
        let err = WorkflowGraph::build(
            vec![TaskNode::ordinary("a", 1)],
            vec![relation(("a", 1), ("ghost", 9))],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DanglingRelation { .. }));
    }

    #[test]
    fn test_non_positive_relation_codes_rejected() {
        let err = WorkflowGraph::build(
            vec![TaskNode::ordinary("a", 0), TaskNode::ordinary("b", -1)],
            vec![relation(("a", 0), ("b", -1))],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationCodes { .. }));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = WorkflowGraph::build(
            vec![
                TaskNode::ordinary("a", 1),
                TaskNode::ordinary("b", 2),
                TaskNode::ordinary("c", 3),
            ],
            vec![
                relation(("a", 1), ("b", 2)),
                relation(("b", 2), ("a", 1)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { remaining: 2 }));
    }

    #[test]
    fn test_condition_task_in_graph() {
        let graph = WorkflowGraph::build(
            vec![
                TaskNode::new("gate", 1, TaskType::Condition),
                TaskNode::ordinary("then", 2),
            ],
            vec![relation(("gate", 1), ("then", 2))],
        )
        .unwrap();
        assert!(graph.task_by_name("gate").unwrap().is_condition());
    }

    #[test]
    fn test_relation_round_trip() {
        let original = vec![
            relation(("a", 1), ("b", 2)),
            relation(("a", 1), ("c", 3)),
            relation(("b", 2), ("d", 4)),
            relation(("c", 3), ("d", 4)),
        ];
        let derived = diamond().relations();
        let mut expected = original.clone();
        expected.sort_by(|a, b| {
            (&a.pre_task_name, &a.post_task_name).cmp(&(&b.pre_task_name, &b.post_task_name))
        });
        assert_eq!(derived, expected);
    }
}
