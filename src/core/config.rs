//! Snapshot configuration
//!
//! Ignore rules and output file names are carried in an explicit value that
//! is handed to the walker and the flows. Defaults can be overridden by a
//! JSON config file and extended from the command line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SnapError};

pub const DEFAULT_JSON_FILE: &str = "project_content.json";
pub const DEFAULT_XML_FILE: &str = "project_content.xml";

pub const DEFAULT_IGNORE_DIRS: &[&str] = &[".git", "__pycache__", ".idea", ".venv", "node_modules"];

pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    // IDE / system
    ".pyc", ".vsidx", ".wsuo", ".sqlite", ".sqlite3", ".bak", ".tmp", ".log", ".swp", ".iml",
    // Compiled / libraries
    ".dll", ".so", ".a", ".o", ".obj", ".class", ".bin", ".pdb",
    // Archives
    ".zip", ".rar", ".7z", ".gz", ".tar", ".tgz",
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".ico", ".icns", ".svg", ".webp", ".bmp",
    // Media
    ".mp4", ".mov", ".avi", ".mp3", ".wav", ".ogg", ".flac",
    // Fonts
    ".ttf", ".otf", ".woff", ".woff2",
    // Documents / executables
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".exe", ".msi",
];

/// Normalize an extension to lowercase with a leading dot
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Directory names and file extensions excluded from a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    dirs: BTreeSet<String>,
    extensions: BTreeSet<String>,
}

impl IgnoreRules {
    /// Build rules from directory names and extensions (normalized on the way in)
    pub fn new<D, E>(dirs: D, extensions: E) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
        }
    }

    /// Exact basename match
    pub fn ignores_dir(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.dirs.contains(n))
    }

    /// Case-insensitive match on the final dotted suffix of the file name
    pub fn ignores_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&normalize_extension(ext)))
    }

    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// Configuration for the snapshot command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Directory names pruned at any depth
    pub ignore_dirs: Vec<String>,

    /// Extensions classified as binary without reading the file
    pub ignore_extensions: Vec<String>,

    /// File name of the mapping document
    pub json_file: String,

    /// File name of the markup document
    pub xml_file: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore_extensions: DEFAULT_IGNORE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            json_file: DEFAULT_JSON_FILE.to_string(),
            xml_file: DEFAULT_XML_FILE.to_string(),
        }
    }
}

impl SnapshotConfig {
    /// Config with no ignore rules
    #[allow(dead_code)]
    pub fn empty() -> Self {
        Self {
            ignore_dirs: Vec::new(),
            ignore_extensions: Vec::new(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SnapError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| SnapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Add extra ignore entries on top of the current ones
    pub fn extend(&mut self, dirs: &[String], extensions: &[String]) {
        self.ignore_dirs.extend(dirs.iter().cloned());
        self.ignore_extensions.extend(extensions.iter().cloned());
    }

    /// Ignore rules for the walker
    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::new(self.ignore_dirs.iter().cloned(), &self.ignore_extensions)
    }
}
