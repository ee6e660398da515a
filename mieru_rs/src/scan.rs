//! Flat directory walk producing the scanned file list.
//!
//! Build-output and vendor directories are skipped by name, hidden entries are
//! skipped unless requested, and only the frontend extension allowlist is kept.

use std::path::{Path, PathBuf};
use std::time::Instant;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::MieruConfig;
use crate::error::ScanError;
use crate::types::{SUPPORTED_EXTENSIONS, SourceFile, extension_of, slash_path};

/// Directory names never descended into.
pub const DEFAULT_IGNORED_DIRS: [&str; 9] = [
    "node_modules",
    ".git",
    "dist",
    "build",
    ".nuxt",
    ".next",
    "coverage",
    ".nyc_output",
    ".cache",
];

#[derive(Clone, Debug)]
pub struct ScanOptions {
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub include_hidden: bool,
    pub max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            ignore_patterns: Vec::new(),
            include_hidden: false,
            max_depth: None,
        }
    }
}

impl ScanOptions {
    pub fn from_config(config: &MieruConfig) -> Self {
        let mut opts = Self::default();
        if !config.extensions.is_empty() {
            opts.extensions = config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect();
        }
        opts.ignore_patterns = config.ignore_patterns.clone();
        opts.include_hidden = config.include_hidden;
        opts.max_depth = config.max_scan_depth;
        opts
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ScanResult {
    pub root: PathBuf,
    pub files: Vec<SourceFile>,
    /// Entries that could not be walked or stat-ed. The scan continues past them.
    pub errors: Vec<String>,
    pub scan_duration_ms: f64,
}

pub fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, ScanError> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        let glob = Glob::new(pat).map_err(|source| ScanError::InvalidPattern {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
        added = true;
    }
    if !added {
        return Ok(None);
    }
    builder
        .build()
        .map(Some)
        .map_err(|source| ScanError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|s| DEFAULT_IGNORED_DIRS.contains(&s))
            .unwrap_or(false)
}

/// Walk `root` and collect every analyzable file, sorted by relative path.
pub fn scan_project(root: &Path, opts: &ScanOptions) -> Result<ScanResult, ScanError> {
    let started = Instant::now();
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let root = root.canonicalize().map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let excluded = build_globset(&opts.ignore_patterns)?;

    let mut walker = WalkDir::new(&root).follow_links(false);
    if let Some(depth) = opts.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    let mut errors = Vec::new();
    let include_hidden = opts.include_hidden;

    for entry in walker
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e) && (include_hidden || !is_hidden(e)))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("walk error: {}", err);
                errors.push(err.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = extension_of(path);
        if !opts.extensions.iter().any(|e| *e == ext) {
            continue;
        }

        let relative = path.strip_prefix(&root).unwrap_or(path);
        if let Some(set) = &excluded
            && set.is_match(slash_path(relative))
        {
            debug!("excluded by pattern: {}", relative.display());
            continue;
        }

        match SourceFile::from_path(&root, path) {
            Ok(file) => files.push(file),
            Err(err) => {
                warn!("failed to stat {}: {}", path.display(), err);
                errors.push(format!("{}: {}", path.display(), err));
            }
        }
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    info!("scanned {} files under {}", files.len(), root.display());

    Ok(ScanResult {
        root,
        files,
        errors,
        scan_duration_ms: started.elapsed().as_secs_f64() * 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, "export {}\n").expect("write");
    }

    fn relative_names(result: &ScanResult) -> Vec<String> {
        result.files.iter().map(|f| f.relative_str()).collect()
    }

    #[test]
    fn skips_build_output_and_hidden_entries() {
        let tmp = TempDir::new().expect("tempdir");
        touch(tmp.path(), "src/App.tsx");
        touch(tmp.path(), "src/components/Header.vue");
        touch(tmp.path(), "node_modules/react/index.js");
        touch(tmp.path(), "dist/bundle.js");
        touch(tmp.path(), ".nuxt/routes.js");
        touch(tmp.path(), ".hidden/Secret.tsx");
        touch(tmp.path(), "src/styles.css");

        let result = scan_project(tmp.path(), &ScanOptions::default()).expect("scan");
        assert_eq!(
            relative_names(&result),
            vec!["src/App.tsx", "src/components/Header.vue"]
        );
        assert!(result.errors.is_empty());
    }

    #[test]
    fn hidden_entries_can_be_included() {
        let tmp = TempDir::new().expect("tempdir");
        touch(tmp.path(), ".storybook/Preview.tsx");
        let opts = ScanOptions {
            include_hidden: true,
            ..ScanOptions::default()
        };
        let result = scan_project(tmp.path(), &opts).expect("scan");
        assert_eq!(relative_names(&result), vec![".storybook/Preview.tsx"]);
    }

    #[test]
    fn ignore_patterns_apply_to_relative_paths() {
        let tmp = TempDir::new().expect("tempdir");
        touch(tmp.path(), "src/legacy/Old.jsx");
        touch(tmp.path(), "src/New.jsx");
        let opts = ScanOptions {
            ignore_patterns: vec!["src/legacy/**".into()],
            ..ScanOptions::default()
        };
        let result = scan_project(tmp.path(), &opts).expect("scan");
        assert_eq!(relative_names(&result), vec!["src/New.jsx"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = scan_project(&tmp.path().join("nope"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::MissingRoot(_)));
    }

    #[test]
    fn invalid_glob_is_reported() {
        let err = build_globset(&["src/[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("src/["));
    }
}
