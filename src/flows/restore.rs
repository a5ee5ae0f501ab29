//! Restore flow - rebuild a file tree from a mapping or markup document
//!
//! Document-level problems (missing file, unsupported extension, malformed
//! or empty document) abort before anything is written. Once writing starts,
//! each file stands alone: a failure is logged, recorded in the report and
//! the remaining files are still written.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::core::error::SnapError;
use crate::core::model::{Document, FileRecord, Report, RestoreFailure, RestoreReport};
use crate::core::paths::resolve_under;
use crate::core::render::{RenderConfig, Renderer};
use crate::formats::{parse_document, DocumentFormat};

/// Read and parse a document, picking the format from its extension
pub fn load_document(path: &Path) -> crate::core::error::Result<Document> {
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|e| SnapError::io(path, e))?;
    let document = parse_document(format, &text)?;

    if document.is_empty() {
        return Err(SnapError::EmptyDocument(path.to_path_buf()));
    }
    Ok(document)
}

fn write_record(target: &Path, record: &FileRecord) -> std::result::Result<(), String> {
    let full_path = resolve_under(target, &record.path)
        .ok_or_else(|| "path is not a relative path inside the target".to_string())?;

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(&full_path, record.content.as_bytes()).map_err(|e| e.to_string())
}

/// Write every record under `target`, overwriting existing files
pub fn restore_document(document: &Document, target: &Path) -> RestoreReport {
    let mut report = RestoreReport {
        target: target.display().to_string(),
        total: document.len(),
        ..Default::default()
    };

    for record in document.records() {
        match write_record(target, record) {
            Ok(()) => report.written += 1,
            Err(message) => {
                warn!("Cannot restore {}: {}", record.path, message);
                report.failures.push(RestoreFailure {
                    path: record.path.clone(),
                    message,
                });
            }
        }
    }

    info!(
        "Restored {}/{} files into {}",
        report.written,
        report.total,
        target.display()
    );
    report
}

/// Load a document and rebuild it under `target`
pub fn restore(document_path: &Path, target: &Path) -> crate::core::error::Result<RestoreReport> {
    let document = load_document(document_path)?;
    Ok(restore_document(&document, target))
}

/// Run the restore command
pub fn run_restore(document_path: &Path, target: &Path, render_config: RenderConfig) -> Result<()> {
    let report = restore(document_path, target)?;

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&Report::Restore(report)));

    Ok(())
}
