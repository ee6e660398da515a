//! Configuration file support for mieru.
//!
//! Loads optional `.mieru/config.toml` from the project root. Every field has a
//! default, so a partial file only overrides what it names.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::pages::ExpansionTracking;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MieruConfig {
    /// Extra glob patterns to skip while scanning (on top of the built-in list).
    pub ignore_patterns: Vec<String>,
    /// Extension allowlist, without dots. Empty means the built-in list.
    pub extensions: Vec<String>,
    /// Walk hidden files and directories.
    pub include_hidden: bool,
    /// Maximum directory depth for the walker.
    pub max_scan_depth: Option<usize>,
    /// Component expansion depth. Unset means 5 for React-like projects and 3
    /// for Vue-like ones.
    pub max_expansion_depth: Option<usize>,
    pub expansion_tracking: ExpansionTracking,
    pub include_dynamic_imports: bool,
    pub detect_circular: bool,
    pub min_cluster_size: usize,
    pub top_n: usize,
}

impl Default for MieruConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            extensions: Vec::new(),
            include_hidden: false,
            max_scan_depth: None,
            max_expansion_depth: None,
            expansion_tracking: ExpansionTracking::PerPage,
            include_dynamic_imports: true,
            detect_circular: true,
            min_cluster_size: 3,
            top_n: 10,
        }
    }
}

impl MieruConfig {
    /// Load config from `.mieru/config.toml` in the given root directory.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".mieru").join("config.toml");
        Self::load_from_path(&config_path)
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
