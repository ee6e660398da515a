//! Circular dependency detection.
//!
//! Depth-first search with an explicit stack and an on-stack set. A back
//! edge to a node on the current path closes a cycle. Cycles over the same
//! set of files are reported once.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::graph::{DependencyGraph, GraphEdge};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularDependency {
    /// Closed walk: the first file is repeated at the end.
    pub cycle: Vec<PathBuf>,
    /// Number of edges in the cycle.
    pub length: usize,
    pub edges: Vec<GraphEdge>,
}

impl CircularDependency {
    fn from_walk(graph: &DependencyGraph, walk: Vec<PathBuf>) -> Self {
        let edges = walk
            .windows(2)
            .filter_map(|pair| graph.first_edge(&pair[0], &pair[1]).cloned())
            .collect();
        Self {
            length: walk.len().saturating_sub(1),
            cycle: walk,
            edges,
        }
    }

    /// `A -> B -> A` using the node names.
    pub fn describe(&self, graph: &DependencyGraph) -> String {
        self.cycle
            .iter()
            .map(|p| {
                graph
                    .nodes
                    .get(p)
                    .map(|n| n.name.clone())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

pub fn find_cycles(graph: &DependencyGraph) -> Vec<CircularDependency> {
    let adj = graph.adjacency();
    let empty: Vec<&Path> = Vec::new();

    let mut visited: HashSet<&Path> = HashSet::new();
    let mut seen_sets: HashSet<BTreeSet<&Path>> = HashSet::new();
    let mut cycles = Vec::new();

    for start in graph.nodes.keys() {
        let start = start.as_path();
        if visited.contains(start) {
            continue;
        }

        // (node, next neighbour index)
        let mut stack: Vec<(&Path, usize)> = vec![(start, 0)];
        let mut path: Vec<&Path> = vec![start];
        let mut on_stack: HashMap<&Path, usize> = HashMap::from([(start, 0)]);
        visited.insert(start);

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let neighbours = adj.get(node).unwrap_or(&empty);
            if frame.1 >= neighbours.len() {
                stack.pop();
                path.pop();
                on_stack.remove(node);
                continue;
            }
            let next = neighbours[frame.1];
            frame.1 += 1;

            if let Some(&pos) = on_stack.get(next) {
                let members: BTreeSet<&Path> = path[pos..].iter().copied().collect();
                if seen_sets.insert(members) {
                    let mut walk: Vec<PathBuf> = path[pos..].iter().map(|p| p.to_path_buf()).collect();
                    walk.push(next.to_path_buf());
                    cycles.push(CircularDependency::from_walk(graph, walk));
                }
                continue;
            }
            if visited.insert(next) {
                on_stack.insert(next, path.len());
                path.push(next);
                stack.push((next, 0));
            }
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::graph::{EdgeKind, ExportShape, GraphNode, NodeType};

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::default();
        for n in nodes {
            g.nodes.insert(
                PathBuf::from(n),
                GraphNode {
                    path: PathBuf::from(n),
                    relative_path: PathBuf::from(n),
                    name: n.to_string(),
                    node_type: NodeType::Js,
                    export_shape: ExportShape::None,
                    definition_count: 0,
                    line_count: 0,
                },
            );
        }
        for (from, to) in edges {
            g.edges.push(GraphEdge {
                from: PathBuf::from(from),
                to: PathBuf::from(to),
                kind: EdgeKind::Import,
                name: None,
                line: 1,
                weight: 1,
                props: Vec::new(),
            });
        }
        g
    }

    #[test]
    fn two_node_cycle() {
        let g = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let cycles = find_cycles(&g);
        assert_eq!(cycles.len(), 1);
        let c = &cycles[0];
        assert_eq!(c.cycle, vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("a")]);
        assert_eq!(c.length, 2);
        assert_eq!(c.edges.len(), 2);
        assert_eq!(c.describe(&g), "a -> b -> a");
    }

    #[test]
    fn every_consecutive_pair_is_an_edge() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "b")],
        );
        let cycles = find_cycles(&g);
        assert!(!cycles.is_empty());
        for c in &cycles {
            assert_eq!(c.cycle.first(), c.cycle.last());
            assert_eq!(c.length, c.cycle.len() - 1);
            for pair in c.cycle.windows(2) {
                assert!(g.has_edge(&pair[0], &pair[1]));
            }
        }
    }

    #[test]
    fn self_loop_and_acyclic() {
        let g = graph(&["a"], &[("a", "a")]);
        let cycles = find_cycles(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].length, 1);

        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        assert!(find_cycles(&g).is_empty());
    }

    #[test]
    fn duplicate_node_sets_reported_once() {
        let g = graph(&["a", "b"], &[("a", "b"), ("a", "b"), ("b", "a"), ("b", "a")]);
        assert_eq!(find_cycles(&g).len(), 1);
    }
}
