//! End-to-end run: scan, extract, graph, analysis, pages.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::analyzer::{
    DegreeRank, DependencyGraph, GraphOptions, RelationshipStats, analyze_relationships,
    build_graph, detect_clusters, extract_batch, most_depended, most_depending,
    relationship_stats,
};
use crate::config::MieruConfig;
use crate::detect::{FrameworkHint, ProjectFlavor, detect_framework, load_hint, resolve_flavor};
use crate::error::Result;
use crate::pages::{
    PageOptions, PageStructure, ProjectContext, resolve_convention_pages, resolve_pages,
};
use crate::scan::{ScanOptions, scan_project};

/// What to run and what to keep in the report.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: MieruConfig,
    /// Replaces the `package.json` guess when set.
    pub hint_path: Option<PathBuf>,
    pub include_graph: bool,
    pub include_pages: bool,
    /// Classify every node pair. Quadratic in the node count.
    pub relationships: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config: MieruConfig::default(),
            hint_path: None,
            include_graph: true,
            include_pages: true,
            relationships: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Counts a caller can show without digging through the records.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub total_files: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub scan_errors: Vec<String>,
    pub scan_duration_ms: f64,
    pub extraction_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphAnalysis {
    pub clusters: Vec<Vec<PathBuf>>,
    pub most_depended: Vec<DegreeRank>,
    pub most_depending: Vec<DegreeRank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<RelationshipStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub root: PathBuf,
    pub flavor: ProjectFlavor,
    pub framework: FrameworkHint,
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<DependencyGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<GraphAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<PageStructure>,
}

impl Report {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} files parsed successfully",
            self.diagnostics.success_count, self.diagnostics.total_files
        )
    }
}

fn analyze_graph(graph: &DependencyGraph, config: &MieruConfig, relationships: bool) -> GraphAnalysis {
    GraphAnalysis {
        clusters: detect_clusters(graph, config.min_cluster_size),
        most_depended: most_depended(graph, config.top_n),
        most_depending: most_depending(graph, config.top_n),
        relationships: relationships.then(|| relationship_stats(&analyze_relationships(graph))),
    }
}

/// Resolve pages for `flavor`. An entry-point failure falls back to the
/// path-convention resolver.
pub fn resolve_pages_with_fallback(
    ctx: &ProjectContext<'_>,
    flavor: ProjectFlavor,
    hint: Option<&FrameworkHint>,
    options: &PageOptions,
) -> PageStructure {
    match resolve_pages(ctx, flavor, hint, options) {
        Ok(structure) => structure,
        Err(e) => {
            warn!("{}; falling back to path conventions", e);
            resolve_convention_pages(ctx, flavor, hint, options)
        }
    }
}

/// Run the whole pipeline on `root`. Fails only for an unusable root or an
/// unreadable hint file; per-file problems end up in the diagnostics.
pub fn analyze_project(root: &Path, options: &RunOptions) -> Result<Report> {
    let config = &options.config;
    let scan = scan_project(root, &ScanOptions::from_config(config))?;

    let hint = match &options.hint_path {
        Some(path) => load_hint(path)?,
        None => detect_framework(&scan.root),
    };

    let batch = extract_batch(&scan.files);
    let parse_failures = batch
        .records
        .iter()
        .filter(|r| !r.is_ok())
        .map(|r| ParseFailure {
            path: r.path.clone(),
            error: r.errors.join("; "),
        })
        .collect();

    let graph = build_graph(
        &scan.files,
        &batch.records,
        &GraphOptions {
            detect_circular: config.detect_circular,
            include_dynamic_imports: config.include_dynamic_imports,
        },
    );
    info!(
        "graph: {} nodes, {} edges, {} cycles",
        graph.stats.total_nodes, graph.stats.total_edges, graph.stats.circular_count
    );

    let flavor = resolve_flavor(&scan.files, Some(&hint));
    info!("project flavor: {}", flavor);

    let pages = options.include_pages.then(|| {
        let ctx = ProjectContext::new(&scan.root, &scan.files, &batch.records);
        let page_options = PageOptions {
            max_depth: config.max_expansion_depth,
            tracking: config.expansion_tracking,
        };
        resolve_pages_with_fallback(&ctx, flavor, Some(&hint), &page_options)
    });

    let analysis = options
        .include_graph
        .then(|| analyze_graph(&graph, config, options.relationships));

    Ok(Report {
        generated_at: Utc::now(),
        root: scan.root,
        flavor,
        framework: hint,
        diagnostics: Diagnostics {
            total_files: batch.total_files,
            success_count: batch.success_count,
            error_count: batch.error_count,
            parse_failures,
            scan_errors: scan.errors,
            scan_duration_ms: scan.scan_duration_ms,
            extraction_time_ms: batch.total_time_ms,
        },
        graph: options.include_graph.then_some(graph),
        analysis,
        pages,
    })
}
