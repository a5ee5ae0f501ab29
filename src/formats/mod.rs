//! Document formats
//!
//! Provides:
//! - mapping: flat JSON object of path → content
//! - markup: XML with one `<file>` element per file
//!
//! Both formats share the same entry consumption rules: directories are
//! counted but never written, binary files get the sentinel literal, text
//! files go through the decode chain.

pub mod mapping;
pub mod markup;

use std::path::Path;
use tracing::warn;

use crate::core::decoder::read_text_file;
use crate::core::error::{Result, SnapError};
use crate::core::model::{Document, Entry, EntryKind, BINARY_SENTINEL};

/// The two document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Mapping,
    Markup,
}

impl DocumentFormat {
    /// File extension (without the dot) used by documents of this format
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Mapping => "json",
            DocumentFormat::Markup => "xml",
        }
    }

    /// Select the format from a document path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(DocumentFormat::Mapping),
            "xml" => Ok(DocumentFormat::Markup),
            _ => Err(SnapError::UnsupportedFormat(format!(".{}", ext))),
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "mapping" => Ok(DocumentFormat::Mapping),
            "xml" | "markup" => Ok(DocumentFormat::Markup),
            _ => Err(format!("Unknown document format: {}", s)),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Incrementally builds one document
pub trait DocumentEncoder {
    fn format(&self) -> DocumentFormat;

    /// Append one file record; `path` is the root-relative slash path
    fn add_file(&mut self, path: &str, content: &str);

    /// Number of file records added so far
    fn file_count(&self) -> usize;

    /// Render the complete document text
    fn finish(&self) -> Result<String>;
}

/// Create an empty encoder for a format
pub fn encoder_for(format: DocumentFormat) -> Box<dyn DocumentEncoder> {
    match format {
        DocumentFormat::Mapping => Box::new(mapping::MappingEncoder::new()),
        DocumentFormat::Markup => Box::new(markup::MarkupEncoder::new()),
    }
}

/// Parse document text of the given format into path → content records
pub fn parse_document(format: DocumentFormat, text: &str) -> Result<Document> {
    match format {
        DocumentFormat::Mapping => mapping::parse_mapping(text),
        DocumentFormat::Markup => markup::parse_markup(text),
    }
}

/// Content stored for a file entry; `None` for directories.
///
/// A text file that can no longer be read is stored as a diagnostic string
/// instead of aborting the document.
pub fn entry_content(entry: &Entry) -> Option<String> {
    match entry.kind {
        EntryKind::Directory => None,
        EntryKind::BinaryFile => Some(BINARY_SENTINEL.to_string()),
        EntryKind::TextFile => match read_text_file(&entry.absolute_path) {
            Ok(decoded) => {
                if decoded.is_lossy() {
                    warn!(
                        "{}: decoded as {}, undecodable bytes dropped",
                        entry.relative_path,
                        decoded.encoding.as_str()
                    );
                }
                Some(decoded.text)
            }
            Err(e) => {
                warn!("Cannot read {}: {}", entry.relative_path, e);
                Some(format!("Error reading file: {}", e))
            }
        },
    }
}
