//! Error types for the hard failures of the pipeline.
//!
//! Per-file problems (syntax errors, unreadable or vanished files, unresolved
//! imports) are not errors here: they are recorded in fact records or logged,
//! and the batch keeps going.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("project root does not exist: {0}")]
    MissingRoot(PathBuf),
    #[error("project root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("invalid ignore pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No conventional entry file with a routing signature, and no file-system
    /// routing directory to fall back on.
    #[error("no application entry point with routing found under {0}")]
    NoEntryPoint(PathBuf),
    #[error("failed to read entry point {path}: {source}")]
    UnreadableEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read framework hint {path}: {source}")]
    HintIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid framework hint {path}: {source}")]
    HintFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum MieruError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = MieruError> = std::result::Result<T, E>;
