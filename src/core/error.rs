//! Error types for document-level failures
//!
//! Per-entry problems (an unreadable directory during a walk, a file that
//! vanished before it could be read, a path that cannot be written during
//! restore) are absorbed where they happen and only show up in reports.
//! Everything here aborts the current operation.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the core, formats and flows
pub type Result<T> = std::result::Result<T, SnapError>;

#[derive(Debug, Error)]
pub enum SnapError {
    /// I/O failure on the document itself or on the config file
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document extension is neither `.json` nor `.xml`
    #[error("Unsupported document type: {0:?} (expected .json or .xml)")]
    UnsupportedFormat(String),

    /// Mapping document is not valid JSON
    #[error("Invalid mapping document: {0}")]
    Mapping(#[from] serde_json::Error),

    /// Markup document is not well-formed XML
    #[error("Invalid markup document: {0}")]
    Markup(String),

    /// Document parsed but has the wrong shape
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Document contains no file records
    #[error("No restorable files found in {0:?}")]
    EmptyDocument(PathBuf),

    /// Config file could not be parsed
    #[error("Invalid config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

impl SnapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<quick_xml::Error> for SnapError {
    fn from(e: quick_xml::Error) -> Self {
        SnapError::Markup(e.to_string())
    }
}
