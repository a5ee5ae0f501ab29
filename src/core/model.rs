//! Snapshot data model
//!
//! Entries are produced fresh by every walk, documents are built by a
//! serializer or a parser and consumed in the same operation, and reports are
//! what the CLI renders at the end. Nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Literal stored in place of content for any file classified as binary
pub const BINARY_SENTINEL: &str = "Binary File CANNOT Be Read";

/// Classification of a walked filesystem object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Directory,
    TextFile,
    BinaryFile,
}

impl EntryKind {
    #[allow(dead_code)]
    pub fn is_file(&self) -> bool {
        !matches!(self, EntryKind::Directory)
    }
}

/// One filesystem object discovered by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Location on the host filesystem
    pub absolute_path: PathBuf,

    /// Path relative to the walk root, segments joined by '/'
    pub relative_path: String,

    pub kind: EntryKind,
}

impl Entry {
    /// Create an entry from its host path and root-relative key
    pub fn new(absolute_path: PathBuf, relative_path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            absolute_path,
            relative_path: relative_path.into(),
            kind,
        }
    }
}

/// Files and directories observed while building a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    pub files: usize,
    pub dirs: usize,
}

impl WalkStats {
    /// Count one more entry of the given kind
    pub fn observe(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.dirs += 1,
            EntryKind::TextFile | EntryKind::BinaryFile => self.files += 1,
        }
    }
}

/// A single path → content pair of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
}

/// Ordered, path-unique collection of file records.
///
/// Both document formats decode into this shape. Inserting a path that is
/// already present keeps its original position and replaces the content.
#[derive(Debug, Clone, Default)]
pub struct Document {
    records: Vec<FileRecord>,
    index: HashMap<String, usize>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, or replace the content of an existing path in place
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.index.get(&path) {
            Some(&i) => self.records[i].content = content,
            None => {
                self.index.insert(path.clone(), self.records.len());
                self.records.push(FileRecord { path, content });
            }
        }
    }

    /// Content stored for a path
    #[allow(dead_code)]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.index
            .get(path)
            .map(|&i| self.records[i].content.as_str())
    }

    /// Records in insertion order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the document has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A document written by the snapshot flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenDocument {
    pub path: String,
    pub format: String,
    pub files: usize,
    pub dirs: usize,
}

/// A file that could not be written during restore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of a restore
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestoreReport {
    pub target: String,
    pub total: usize,
    pub written: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RestoreFailure>,
}

/// What a command reports back to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Report {
    Snapshot {
        root: String,
        documents: Vec<WrittenDocument>,
    },
    Restore(RestoreReport),
}
