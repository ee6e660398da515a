//! # mieru
//!
//! **Page and component structure analyzer** for React, Next.js, Vue and
//! Nuxt.js codebases.
//!
//! mieru parses every script and single-file component once, builds a
//! dependency graph between files, and works out which files are pages, which
//! routes they answer to, and which components each page pulls in.
//!
//! ## Pipeline
//!
//! 1. [`scan`] walks the project and lists analyzable files.
//! 2. [`analyzer::ast_js`] turns each file into a [`types::FileFacts`] record.
//! 3. [`analyzer::graph`] resolves imports and component usages into edges.
//! 4. [`analyzer::cycles`], [`analyzer::relations`] and [`analyzer::metrics`]
//!    answer questions about the graph.
//! 5. [`pages`] resolves pages, routes, component trees and page links.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use mieru::pipeline::{RunOptions, analyze_project};
//! use std::path::Path;
//!
//! let report = analyze_project(Path::new("."), &RunOptions::default()).unwrap();
//! println!("{}", report.summary());
//! if let Some(pages) = &report.pages {
//!     for page in pages.pages.values() {
//!         println!("{} -> {}", page.route, page.name);
//!     }
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! mieru                       # summary of the current directory
//! mieru ./shop --json         # full report as JSON
//! mieru ./shop --pages --max-depth 2
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Fact extraction, graph building and graph analysis.
///
/// # Submodules
///
/// - [`analyzer::ast_js`] - JS/TS/JSX/Vue fact extraction (OXC)
/// - [`analyzer::graph`] - dependency graph builder
/// - [`analyzer::cycles`] - circular dependency detection
/// - [`analyzer::relations`] - pairwise relationship classification
/// - [`analyzer::metrics`] - depth, clusters and degree rankings
/// - [`analyzer::classify`] - path and name heuristics
pub mod analyzer;

/// Optional `.mieru/config.toml`.
pub mod config;

/// Project flavor and framework hints.
pub mod detect;

pub mod error;

/// Report rendering for the CLI.
pub mod output;

/// Page and route resolution.
pub mod pages;

/// The whole run behind one call, see [`pipeline::analyze_project`].
pub mod pipeline;

/// Directory walker.
pub mod scan;

/// Shared records: scanned files and per-file facts.
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use analyzer::{DependencyGraph, build_graph, extract_batch, extract_facts};
pub use config::MieruConfig;
pub use detect::{FrameworkHint, ProjectFlavor};
pub use error::{MieruError, Result};
pub use pages::{PageStructure, ProjectContext, resolve_pages};
pub use pipeline::{Report, RunOptions, analyze_project};
pub use scan::{ScanOptions, scan_project};
pub use types::{FileFacts, SourceFile};
