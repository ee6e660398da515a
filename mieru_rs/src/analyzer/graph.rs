//! Dependency graph construction from fact records.
//!
//! One node per fact record whose file still exists, one edge per resolved
//! import, component usage or dynamic dependency. Edges never point at
//! unresolved targets.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cycles::{CircularDependency, find_cycles};
use super::metrics::max_dependency_depth;
use super::naming::{component_name_from_path, component_name_from_specifier};
use super::resolvers::resolve_relative;
use crate::types::{DynamicImportKind, FileFacts, ImportKind, SourceFile, extension_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Vue,
    React,
    Js,
    Ts,
}

impl NodeType {
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_str() {
            "vue" => NodeType::Vue,
            "jsx" | "tsx" => NodeType::React,
            "ts" | "mts" | "cts" => NodeType::Ts,
            _ => NodeType::Js,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportShape {
    Default,
    Named,
    Both,
    None,
}

impl ExportShape {
    pub fn of(facts: &FileFacts) -> Self {
        match (facts.has_default_export(), facts.has_named_export()) {
            (true, true) => ExportShape::Both,
            (true, false) => ExportShape::Default,
            (false, true) => ExportShape::Named,
            (false, false) => ExportShape::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub name: String,
    pub node_type: NodeType,
    pub export_shape: ExportShape,
    pub definition_count: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Import,
    ComponentUsage,
    DynamicImport,
    Require,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub line: usize,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub detect_circular: bool,
    pub include_dynamic_imports: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            detect_circular: true,
            include_dynamic_imports: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub circular_count: usize,
    /// Nodes touched by no edge at all.
    pub isolated_nodes: usize,
    pub max_depth: usize,
    pub analysis_time_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<PathBuf, GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub circular_dependencies: Vec<CircularDependency>,
    pub stats: GraphStats,
}

impl DependencyGraph {
    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    /// Outgoing neighbours in edge insertion order, without repeats.
    pub fn adjacency(&self) -> HashMap<&Path, Vec<&Path>> {
        let mut adj: HashMap<&Path, Vec<&Path>> = HashMap::new();
        for edge in &self.edges {
            let list = adj.entry(edge.from.as_path()).or_default();
            if !list.contains(&edge.to.as_path()) {
                list.push(edge.to.as_path());
            }
        }
        adj
    }

    /// Direct predecessors of `node`, in edge order.
    pub fn parents(&self, node: &Path) -> Vec<&Path> {
        let mut parents = Vec::new();
        for edge in self.edges.iter().filter(|e| e.to == node) {
            if !parents.contains(&edge.from.as_path()) {
                parents.push(edge.from.as_path());
            }
        }
        parents
    }

    pub fn has_edge(&self, from: &Path, to: &Path) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    pub fn first_edge(&self, from: &Path, to: &Path) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    pub fn recompute_stats(&mut self, analysis_time_ms: f64) {
        let mut touched: std::collections::HashSet<&Path> = std::collections::HashSet::new();
        for edge in &self.edges {
            touched.insert(edge.from.as_path());
            touched.insert(edge.to.as_path());
        }
        self.stats = GraphStats {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            circular_count: self.circular_dependencies.len(),
            isolated_nodes: self.nodes.len().saturating_sub(touched.len()),
            max_depth: max_dependency_depth(self),
            analysis_time_ms,
        };
    }
}

fn build_node(facts: &FileFacts, relative_path: PathBuf, content: &str) -> GraphNode {
    let name = facts
        .default_definition_name()
        .map(str::to_string)
        .unwrap_or_else(|| component_name_from_path(&facts.path));
    GraphNode {
        path: facts.path.clone(),
        relative_path,
        name,
        node_type: NodeType::from_path(&facts.path),
        export_shape: ExportShape::of(facts),
        definition_count: facts.definitions.len(),
        line_count: content.lines().count(),
    }
}

/// Merge a usage into an existing `component-usage` edge or start a new one.
fn add_usage_edge(edges: &mut Vec<GraphEdge>, from: &Path, to: &Path, name: &str, line: usize, props: &[String]) {
    if let Some(edge) = edges
        .iter_mut()
        .find(|e| e.kind == EdgeKind::ComponentUsage && e.from == from && e.to == to)
    {
        edge.weight += 1;
        for prop in props {
            if !edge.props.contains(prop) {
                edge.props.push(prop.clone());
            }
        }
        return;
    }
    let mut merged: Vec<String> = Vec::new();
    for prop in props {
        if !merged.contains(prop) {
            merged.push(prop.clone());
        }
    }
    edges.push(GraphEdge {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        kind: EdgeKind::ComponentUsage,
        name: Some(name.to_string()),
        line,
        weight: 1,
        props: merged,
    });
}

fn file_edges(
    facts: &FileFacts,
    nodes: &BTreeMap<PathBuf, GraphNode>,
    options: &GraphOptions,
    edges: &mut Vec<GraphEdge>,
) {
    let from = facts.path.as_path();
    let known = |spec: &str| resolve_relative(from, spec).filter(|p| nodes.contains_key(p));

    for import in &facts.imports {
        if let Some(to) = known(&import.source) {
            edges.push(GraphEdge {
                from: from.to_path_buf(),
                to,
                kind: EdgeKind::Import,
                name: (!import.name.is_empty()).then(|| import.name.clone()),
                line: import.line,
                weight: 1,
                props: Vec::new(),
            });
        }
    }

    for usage in &facts.usages {
        let matching = facts.imports.iter().find(|imp| {
            imp.name == usage.name
                || (imp.kind == ImportKind::Default
                    && component_name_from_specifier(&imp.source) == usage.name)
        });
        let Some(import) = matching else {
            continue;
        };
        if let Some(to) = known(&import.source) {
            add_usage_edge(edges, from, &to, &usage.name, usage.line, &usage.props);
        }
    }

    if options.include_dynamic_imports {
        for dynamic in &facts.dynamic_imports {
            if let Some(to) = known(&dynamic.source) {
                edges.push(GraphEdge {
                    from: from.to_path_buf(),
                    to,
                    kind: match dynamic.kind {
                        DynamicImportKind::DynamicImport => EdgeKind::DynamicImport,
                        DynamicImportKind::Require => EdgeKind::Require,
                    },
                    name: None,
                    line: dynamic.line,
                    weight: 1,
                    props: Vec::new(),
                });
            }
        }
    }
}

/// Build the graph. `files` supplies relative paths; `records` the facts.
pub fn build_graph(files: &[SourceFile], records: &[FileFacts], options: &GraphOptions) -> DependencyGraph {
    let started = Instant::now();
    let relative: HashMap<&Path, &Path> = files
        .iter()
        .map(|f| (f.path.as_path(), f.relative_path.as_path()))
        .collect();

    let mut graph = DependencyGraph::default();
    let mut included: Vec<&FileFacts> = Vec::new();

    for facts in records {
        // the file may have vanished since the scan
        let content = match std::fs::read_to_string(&facts.path) {
            Ok(content) => content,
            Err(err) => {
                warn!("skipping {}: {}", facts.path.display(), err);
                continue;
            }
        };
        let rel = relative
            .get(facts.path.as_path())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| facts.path.clone());
        let node = build_node(facts, rel, &content);
        graph.nodes.insert(facts.path.clone(), node);
        included.push(facts);
    }

    for facts in included {
        file_edges(facts, &graph.nodes, options, &mut graph.edges);
    }
    debug!(
        "graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    if options.detect_circular {
        graph.circular_dependencies = find_cycles(&graph);
    }
    graph.recompute_stats(started.elapsed().as_secs_f64() * 1000.0);
    info!(
        "dependency graph built: {} nodes, {} edges, {} cycles",
        graph.stats.total_nodes, graph.stats.total_edges, graph.stats.circular_count
    );
    graph
}
