pub mod ast_js;
pub mod classify;
pub mod cycles;
pub mod graph;
pub mod metrics;
pub mod naming;
pub(crate) mod regexes;
pub mod relations;
pub mod resolvers;

pub(crate) fn offset_to_line(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

pub use ast_js::{extract_batch, extract_facts, extract_file};
pub use cycles::{CircularDependency, find_cycles};
pub use graph::{
    DependencyGraph, EdgeKind, ExportShape, GraphEdge, GraphNode, GraphOptions, GraphStats,
    NodeType, build_graph,
};
pub use metrics::{DegreeRank, detect_clusters, max_dependency_depth, most_depended, most_depending};
pub use relations::{
    ComponentRelation, RelationKind, RelationshipStats, analyze_relationships,
    classify_relationship, relationship_stats, shortest_path,
};
