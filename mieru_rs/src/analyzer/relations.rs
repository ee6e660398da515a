//! Pairwise relationship classification between graph nodes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    ParentChild,
    Ancestor,
    Descendant,
    Sibling,
    Independent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRelation {
    pub from: PathBuf,
    pub to: PathBuf,
    pub relation: RelationKind,
    /// Edge count between the two, 0 for direct and unrelated pairs.
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathBuf>,
}

/// First-discovered shortest path, following adjacency insertion order.
pub fn shortest_path(graph: &DependencyGraph, start: &Path, end: &Path) -> Option<Vec<PathBuf>> {
    if start == end {
        return Some(vec![start.to_path_buf()]);
    }
    let adj = graph.adjacency();
    let mut came_from: HashMap<&Path, &Path> = HashMap::new();
    let mut seen: HashSet<&Path> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for &next in adj.get(node).map(Vec::as_slice).unwrap_or(&[]) {
            if !seen.insert(next) {
                continue;
            }
            came_from.insert(next, node);
            if next == end {
                let mut path = vec![next.to_path_buf()];
                let mut cursor = next;
                while let Some(&prev) = came_from.get(cursor) {
                    path.push(prev.to_path_buf());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}

pub fn classify_relationship(graph: &DependencyGraph, a: &Path, b: &Path) -> ComponentRelation {
    let relation = |relation, depth, path| ComponentRelation {
        from: a.to_path_buf(),
        to: b.to_path_buf(),
        relation,
        depth,
        path,
    };

    if graph.has_edge(a, b) {
        return relation(
            RelationKind::ParentChild,
            0,
            vec![a.to_path_buf(), b.to_path_buf()],
        );
    }
    // a one-edge path is already caught above
    if let Some(path) = shortest_path(graph, a, b) {
        let depth = path.len() - 1;
        return relation(RelationKind::Ancestor, depth, path);
    }
    if let Some(mut path) = shortest_path(graph, b, a) {
        let depth = path.len() - 1;
        path.reverse();
        return relation(RelationKind::Descendant, depth, path);
    }

    let parents_a = graph.parents(a);
    let parents_b = graph.parents(b);
    if parents_a.iter().any(|p| parents_b.contains(p)) {
        return relation(RelationKind::Sibling, 0, Vec::new());
    }
    relation(RelationKind::Independent, 0, Vec::new())
}

/// Classify every node pair in both directions, keeping related pairs only.
/// The reverse direction is kept only when it says something new.
pub fn analyze_relationships(graph: &DependencyGraph) -> Vec<ComponentRelation> {
    let nodes: Vec<&Path> = graph.nodes.keys().map(PathBuf::as_path).collect();
    let mut relations = Vec::new();
    for (i, &a) in nodes.iter().enumerate() {
        for &b in &nodes[i + 1..] {
            let forward = classify_relationship(graph, a, b);
            let backward = classify_relationship(graph, b, a);
            let forward_kind = forward.relation;
            if forward_kind != RelationKind::Independent {
                relations.push(forward);
            }
            if backward.relation != RelationKind::Independent && backward.relation != forward_kind {
                relations.push(backward);
            }
        }
    }
    relations
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipStats {
    pub total: usize,
    pub parent_child: usize,
    pub ancestor: usize,
    pub descendant: usize,
    pub sibling: usize,
    pub independent: usize,
    pub avg_depth: f64,
    pub max_depth: usize,
}

pub fn relationship_stats(relations: &[ComponentRelation]) -> RelationshipStats {
    let mut stats = RelationshipStats {
        total: relations.len(),
        ..RelationshipStats::default()
    };
    let mut depth_sum = 0usize;
    for rel in relations {
        match rel.relation {
            RelationKind::ParentChild => stats.parent_child += 1,
            RelationKind::Ancestor => stats.ancestor += 1,
            RelationKind::Descendant => stats.descendant += 1,
            RelationKind::Sibling => stats.sibling += 1,
            RelationKind::Independent => stats.independent += 1,
        }
        depth_sum += rel.depth;
        stats.max_depth = stats.max_depth.max(rel.depth);
    }
    if !relations.is_empty() {
        stats.avg_depth = depth_sum as f64 / relations.len() as f64;
    }
    stats
}
