//! Report rendering: pretty JSON or a short colored summary.

use std::fmt::Write as _;
use std::path::Path;

use colored::Colorize;

use crate::pages::PageStructure;
use crate::pipeline::Report;

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn relative<'a>(root: &Path, path: &'a Path) -> std::borrow::Cow<'a, str> {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy()
}

fn render_pages(out: &mut String, root: &Path, pages: &PageStructure) {
    let stats = &pages.stats;
    let _ = writeln!(
        out,
        "{} {} pages, {} components, {} links, {} isolated",
        "Pages:".bold(),
        stats.total_pages,
        stats.total_components,
        stats.total_links,
        stats.isolated_pages
    );
    for page in pages.pages.values() {
        let _ = writeln!(
            out,
            "  {} {} ({})",
            page.route.cyan(),
            page.name.bold(),
            relative(root, &page.path).dimmed()
        );
        for component in &page.components {
            let depth = component.depth.unwrap_or(0);
            let _ = writeln!(out, "    {}{}", "  ".repeat(depth), component.name);
        }
    }
}

/// Human-readable summary. Colors follow the `colored` environment rules
/// (`NO_COLOR`, `CLICOLOR_FORCE`).
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    let diag = &report.diagnostics;

    let _ = writeln!(
        out,
        "{} {} ({}, {})",
        "mieru".bold(),
        report.root.display(),
        report.flavor.to_string().green(),
        report.framework.name
    );
    let status = if diag.error_count == 0 {
        report.summary().green()
    } else {
        report.summary().yellow()
    };
    let _ = writeln!(out, "{status}");
    for failure in &diag.parse_failures {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            "!".red(),
            relative(&report.root, &failure.path),
            failure.error
        );
    }

    if let Some(graph) = &report.graph {
        let stats = &graph.stats;
        let _ = writeln!(
            out,
            "{} {} nodes, {} edges, {} isolated, max depth {}",
            "Graph:".bold(),
            stats.total_nodes,
            stats.total_edges,
            stats.isolated_nodes,
            stats.max_depth
        );
        if graph.circular_dependencies.is_empty() {
            let _ = writeln!(out, "  {}", "no circular dependencies".green());
        } else {
            for cycle in &graph.circular_dependencies {
                let _ = writeln!(out, "  {} {}", "cycle".red(), cycle.describe(graph));
            }
        }
    }

    if let Some(analysis) = &report.analysis {
        for rank in analysis.most_depended.iter().filter(|r| r.count > 0).take(5) {
            let _ = writeln!(
                out,
                "  used by {:>3}: {}",
                rank.count,
                relative(&report.root, &rank.path)
            );
        }
        if !analysis.clusters.is_empty() {
            let sizes: Vec<String> = analysis.clusters.iter().map(|c| c.len().to_string()).collect();
            let _ = writeln!(out, "  clusters: {}", sizes.join(", "));
        }
    }

    if let Some(pages) = &report.pages {
        render_pages(&mut out, &report.root, pages);
    }
    out
}
