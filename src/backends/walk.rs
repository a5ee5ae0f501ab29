//! Tree walker
//!
//! Uses walkdir to traverse the root top-down. Ignored directory names are
//! pruned before descending, so nothing below them is ever visited. Every
//! surviving file is classified as text or binary. Symlinks are not
//! followed into directories, but a link to a regular file is captured with
//! the content it points to.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::config::IgnoreRules;
use crate::core::decoder::is_binary_file;
use crate::core::model::{Entry, EntryKind, WalkStats};
use crate::core::paths::make_relative;

/// Walks one root with one set of ignore rules
pub struct Walker<'a> {
    root: PathBuf,
    rules: &'a IgnoreRules,
    excluded: Vec<PathBuf>,
}

impl<'a> Walker<'a> {
    /// Create a walker for `root`
    pub fn new(root: impl Into<PathBuf>, rules: &'a IgnoreRules) -> Self {
        Self {
            root: root.into(),
            rules,
            excluded: Vec::new(),
        }
    }

    /// Leave out files whose canonical path is one of `paths`.
    ///
    /// Used for the documents being written, which may live inside the root.
    pub fn excluding(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.excluded.extend(paths);
        self
    }

    /// Classify a regular file by extension first, then by content sniff
    pub fn classify(&self, path: &Path) -> EntryKind {
        if self.rules.ignores_extension(path) || is_binary_file(path) {
            EntryKind::BinaryFile
        } else {
            EntryKind::TextFile
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|excluded| {
            excluded.file_name() == path.file_name()
                && path
                    .canonicalize()
                    .map(|canonical| &canonical == excluded)
                    .unwrap_or(false)
        })
    }

    /// Take a single snapshot of the tree.
    ///
    /// Directories that cannot be listed are logged and skipped; the walk
    /// carries on with their siblings.
    pub fn snapshot(&self) -> WalkSnapshot {
        let rules = self.rules;
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && rules.ignores_dir(e.file_name())));

        let mut entries = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let relative = match make_relative(path, &self.root) {
                Some(r) if !r.is_empty() => r,
                _ => continue,
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                if self.is_excluded(path) {
                    debug!("Skipping output document: {}", relative);
                    continue;
                }
                self.classify(path)
            } else {
                warn!("Skipping non-regular entry: {}", relative);
                continue;
            };

            debug!("{:?} {}", kind, relative);
            entries.push(Entry::new(path.to_path_buf(), relative, kind));
        }

        WalkSnapshot { entries }
    }
}

/// Ordered list of entries captured by one walk.
///
/// Counting and iteration both read the same list, so the progress
/// percentage always matches what is actually processed.
#[derive(Debug, Clone, Default)]
pub struct WalkSnapshot {
    entries: Vec<Entry>,
}

impl WalkSnapshot {
    /// Entries in walk order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of surviving entries (directories + files)
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Check if the walk found nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Files and directories in the snapshot
    pub fn stats(&self) -> WalkStats {
        let mut stats = WalkStats::default();
        for entry in self.entries() {
            stats.observe(entry.kind);
        }
        stats
    }

    /// Entries paired with a running percentage (`processed / total × 100`)
    pub fn with_progress(&self) -> impl Iterator<Item = (&Entry, f64)> + '_ {
        let total = self.total();
        self.entries()
            .iter()
            .enumerate()
            .map(move |(i, entry)| (entry, (i + 1) as f64 / total as f64 * 100.0))
    }
}
