//! Whole-graph measurements: dependency depth, clusters, degree ranking.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::graph::DependencyGraph;

/// Longest chain length via Kahn's algorithm. Nodes inside cycles never
/// reach in-degree zero and are left out of the frontier.
pub fn max_dependency_depth(graph: &DependencyGraph) -> usize {
    if graph.nodes.is_empty() {
        return 0;
    }

    let mut in_degree: HashMap<&Path, usize> =
        graph.nodes.keys().map(|p| (p.as_path(), 0)).collect();
    let mut out: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for edge in &graph.edges {
        *in_degree.entry(edge.to.as_path()).or_insert(0) += 1;
        out.entry(edge.from.as_path()).or_default().push(edge.to.as_path());
    }

    let mut distance: HashMap<&Path, usize> = HashMap::new();
    let mut queue: VecDeque<&Path> = VecDeque::new();
    for path in graph.nodes.keys() {
        if in_degree.get(path.as_path()) == Some(&0) {
            distance.insert(path.as_path(), 0);
            queue.push_back(path.as_path());
        }
    }

    while let Some(node) = queue.pop_front() {
        let current = distance.get(node).copied().unwrap_or(0);
        let Some(targets) = out.get(node) else {
            continue;
        };
        for &next in targets {
            let candidate = current + 1;
            let slot = distance.entry(next).or_insert(0);
            if candidate > *slot {
                *slot = candidate;
            }
            if let Some(deg) = in_degree.get_mut(next) {
                *deg = deg.saturating_sub(1);
                if *deg == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    distance.values().copied().max().unwrap_or(0)
}

/// Connected components of the undirected view, largest first. Components
/// smaller than `min_size` are dropped.
pub fn detect_clusters(graph: &DependencyGraph, min_size: usize) -> Vec<Vec<PathBuf>> {
    let mut neighbours: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for edge in &graph.edges {
        neighbours.entry(edge.from.as_path()).or_default().push(edge.to.as_path());
        neighbours.entry(edge.to.as_path()).or_default().push(edge.from.as_path());
    }

    let mut assigned: BTreeSet<&Path> = BTreeSet::new();
    let mut clusters = Vec::new();

    for start in graph.nodes.keys() {
        let start = start.as_path();
        if !assigned.insert(start) {
            continue;
        }
        let mut members = vec![start.to_path_buf()];
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for &next in neighbours.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                if assigned.insert(next) {
                    members.push(next.to_path_buf());
                    queue.push_back(next);
                }
            }
        }
        if members.len() >= min_size {
            members.sort();
            clusters.push(members);
        }
    }

    clusters.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    clusters
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRank {
    pub path: PathBuf,
    pub count: usize,
}

fn rank(graph: &DependencyGraph, limit: usize, incoming: bool) -> Vec<DegreeRank> {
    let mut counts: HashMap<&Path, usize> =
        graph.nodes.keys().map(|p| (p.as_path(), 0)).collect();
    for edge in &graph.edges {
        let key = if incoming { &edge.to } else { &edge.from };
        *counts.entry(key.as_path()).or_insert(0) += 1;
    }

    let mut ranked: Vec<DegreeRank> = counts
        .into_iter()
        .map(|(path, count)| DegreeRank {
            path: path.to_path_buf(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
    ranked.truncate(limit);
    ranked
}

/// Files with the most incoming edges.
pub fn most_depended(graph: &DependencyGraph, limit: usize) -> Vec<DegreeRank> {
    rank(graph, limit, true)
}

/// Files with the most outgoing edges.
pub fn most_depending(graph: &DependencyGraph, limit: usize) -> Vec<DegreeRank> {
    rank(graph, limit, false)
}
