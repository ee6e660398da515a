//! Page & route resolution.
//!
//! Decides which files are pages, gives each a route, and expands each page's
//! component tree to a bounded depth.
//!
//! # Module Structure
//!
//! - `routes`: route strings from file paths, page names, route matching
//! - `react_router`: entry-point routing (`<Route>` elements, Next file routing)
//! - `conventions`: path-convention pages (Vue, Nuxt and unknown projects)
//! - `expand`: component extraction and bounded recursive expansion
//! - `links`: navigation links and page connections

pub mod conventions;
pub mod expand;
pub mod links;
pub mod react_router;
pub mod routes;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::classify::{ComponentType, ConnectionKind, LinkKind, PageType};
use crate::detect::{FrameworkHint, ProjectFlavor};
use crate::error::ResolveError;
use crate::types::{FileFacts, SourceFile};

/// Whether the "already expanded" set is reset for every page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionTracking {
    /// Each page gets its own tracking state.
    #[default]
    PerPage,
    /// One state for the whole run: a component expanded under one page is
    /// not expanded again under later pages.
    Shared,
}

/// One entry in a page's component tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageComponent {
    pub name: String,
    /// Resolved file, when the component came from a resolvable import.
    pub import_path: Option<PathBuf>,
    pub usage_lines: Vec<usize>,
    pub component_type: ComponentType,
    /// 0 for components the page uses directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    /// Name of the component that uses this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl PageComponent {
    pub fn new(name: impl Into<String>, import_path: Option<PathBuf>, line: usize, component_type: ComponentType) -> Self {
        Self {
            name: name.into(),
            import_path,
            usage_lines: vec![line],
            component_type,
            depth: None,
            parent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub target: String,
    pub kind: LinkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConnection {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: ConnectionKind,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub name: String,
    pub route: String,
    pub page_type: PageType,
    pub components: Vec<PageComponent>,
    pub links: Vec<PageLink>,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl PageNode {
    pub fn from_file(file: &SourceFile, name: String, route: String, page_type: PageType) -> Self {
        Self {
            path: file.path.clone(),
            relative_path: file.relative_path.clone(),
            name,
            route,
            page_type,
            components: Vec::new(),
            links: Vec::new(),
            size: file.size,
            last_modified: file.last_modified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStats {
    pub total_pages: usize,
    pub total_components: usize,
    /// Sum of connection weights.
    pub total_links: u32,
    pub isolated_pages: usize,
    pub analysis_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStructure {
    pub flavor: ProjectFlavor,
    pub pages: BTreeMap<PathBuf, PageNode>,
    pub connections: Vec<PageConnection>,
    pub stats: PageStats,
}

impl PageStructure {
    pub(crate) fn assemble(
        flavor: ProjectFlavor,
        pages: BTreeMap<PathBuf, PageNode>,
        connections: Vec<PageConnection>,
        analysis_time_ms: f64,
    ) -> Self {
        let stats = PageStats {
            total_pages: pages.len(),
            total_components: pages.values().map(|p| p.components.len()).sum(),
            total_links: connections.iter().map(|c| c.weight).sum(),
            isolated_pages: links::count_isolated_pages(&pages, &connections),
            analysis_time_ms,
        };
        Self {
            flavor,
            pages,
            connections,
            stats,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    /// Unset means the flavor default (5 for React-like, 3 otherwise).
    pub max_depth: Option<usize>,
    pub tracking: ExpansionTracking,
}

impl PageOptions {
    pub fn depth_for(&self, flavor: ProjectFlavor) -> usize {
        self.max_depth
            .unwrap_or_else(|| flavor.default_expansion_depth())
    }
}

/// Read-only view over one scanned project: files plus their fact records.
pub struct ProjectContext<'a> {
    pub root: &'a Path,
    pub files: &'a [SourceFile],
    facts: HashMap<&'a Path, &'a FileFacts>,
    by_path: HashMap<&'a Path, &'a SourceFile>,
}

impl<'a> ProjectContext<'a> {
    pub fn new(root: &'a Path, files: &'a [SourceFile], records: &'a [FileFacts]) -> Self {
        Self {
            root,
            files,
            facts: records.iter().map(|r| (r.path.as_path(), r)).collect(),
            by_path: files.iter().map(|f| (f.path.as_path(), f)).collect(),
        }
    }

    pub fn facts(&self, path: &Path) -> Option<&'a FileFacts> {
        self.facts.get(path).copied()
    }

    pub fn file(&self, path: &Path) -> Option<&'a SourceFile> {
        self.by_path.get(path).copied()
    }

    /// Scanned file at a `/`-separated path relative to the root.
    pub fn file_at(&self, relative: &str) -> Option<&'a SourceFile> {
        self.files.iter().find(|f| f.relative_str() == relative)
    }
}

/// Run the resolver that fits `flavor`. Only the entry-point resolver can
/// fail; the caller decides whether to fall back to [`resolve_convention_pages`].
pub fn resolve_pages(
    ctx: &ProjectContext<'_>,
    flavor: ProjectFlavor,
    hint: Option<&FrameworkHint>,
    options: &PageOptions,
) -> Result<PageStructure, ResolveError> {
    if flavor.is_react_like() {
        react_router::resolve_router_pages(ctx, flavor, options)
    } else {
        Ok(conventions::resolve_convention_pages(ctx, flavor, hint, options))
    }
}

pub use conventions::resolve_convention_pages;
pub use react_router::resolve_router_pages;
