//! Snapshot flow - walk a root once and write one or both documents

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backends::walk::{WalkSnapshot, Walker};
use crate::core::config::SnapshotConfig;
use crate::core::model::{Report, WalkStats, WrittenDocument};
use crate::core::paths::canonical_target;
use crate::core::render::{RenderConfig, Renderer};
use crate::formats::{encoder_for, entry_content, DocumentEncoder, DocumentFormat};

/// Which documents to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Json,
    Xml,
    Both,
}

impl FormatChoice {
    /// Document formats produced, in output order
    pub fn formats(&self) -> Vec<DocumentFormat> {
        match self {
            FormatChoice::Json => vec![DocumentFormat::Mapping],
            FormatChoice::Xml => vec![DocumentFormat::Markup],
            FormatChoice::Both => vec![DocumentFormat::Mapping, DocumentFormat::Markup],
        }
    }
}

impl std::str::FromStr for FormatChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(FormatChoice::Json),
            "xml" => Ok(FormatChoice::Xml),
            "both" => Ok(FormatChoice::Both),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Document text produced from one walk
#[derive(Debug, Clone)]
pub struct EncodedSnapshot {
    pub documents: Vec<(DocumentFormat, String)>,
    pub stats: WalkStats,
}

/// Feed every entry of a snapshot through the requested encoders.
///
/// Each file is read and decoded once, however many formats are requested.
pub fn encode_snapshot(
    snapshot: &WalkSnapshot,
    formats: &[DocumentFormat],
) -> crate::core::error::Result<EncodedSnapshot> {
    let mut encoders: Vec<Box<dyn DocumentEncoder>> =
        formats.iter().map(|&f| encoder_for(f)).collect();

    for (entry, progress) in snapshot.with_progress() {
        if let Some(content) = entry_content(entry) {
            for encoder in encoders.iter_mut() {
                encoder.add_file(&entry.relative_path, &content);
            }
        }
        debug!("[{:5.1}%] {}", progress, entry.relative_path);
    }

    let mut documents = Vec::with_capacity(encoders.len());
    for encoder in &encoders {
        debug!("{} document holds {} files", encoder.format(), encoder.file_count());
        documents.push((encoder.format(), encoder.finish()?));
    }

    Ok(EncodedSnapshot {
        documents,
        stats: snapshot.stats(),
    })
}

/// Write document text, creating parent directories as needed
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write document: {:?}", path))?;
    Ok(())
}

/// Decide where each requested document goes.
///
/// An explicit output file selects its format by extension; otherwise the
/// configured file names are placed in `out_dir`.
pub fn resolve_targets(
    output: Option<&Path>,
    out_dir: &Path,
    choice: Option<FormatChoice>,
    config: &SnapshotConfig,
) -> Result<Vec<(DocumentFormat, PathBuf)>> {
    if let Some(output) = output {
        if choice == Some(FormatChoice::Both) {
            anyhow::bail!("--format both cannot be combined with --output");
        }
        let format = DocumentFormat::from_path(output)?;
        return Ok(vec![(format, output.to_path_buf())]);
    }

    Ok(choice
        .unwrap_or_default()
        .formats()
        .into_iter()
        .map(|format| {
            let name = match format {
                DocumentFormat::Mapping => &config.json_file,
                DocumentFormat::Markup => &config.xml_file,
            };
            (format, out_dir.join(name))
        })
        .collect())
}

/// Walk `root` and write every target document
pub fn snapshot_to_files(
    root: &Path,
    config: &SnapshotConfig,
    targets: &[(DocumentFormat, PathBuf)],
) -> Result<Vec<WrittenDocument>> {
    if !root.is_dir() {
        anyhow::bail!("Root is not a directory: {:?}", root);
    }

    let rules = config.ignore_rules();
    debug!(
        "Ignoring dirs [{}] and extensions [{}]",
        rules.dirs().collect::<Vec<_>>().join(", "),
        rules.extensions().collect::<Vec<_>>().join(", ")
    );

    // documents written under the root must not capture their previous run
    let outputs = targets
        .iter()
        .filter_map(|(_, path)| canonical_target(path));
    let snapshot = Walker::new(root, &rules).excluding(outputs).snapshot();
    if snapshot.is_empty() {
        warn!("Nothing to capture under {}", root.display());
    }
    debug!("Walked {} entries", snapshot.total());

    let formats: Vec<_> = targets.iter().map(|(format, _)| *format).collect();
    let encoded = encode_snapshot(&snapshot, &formats)?;

    let mut written = Vec::new();
    for ((format, text), (_, path)) in encoded.documents.iter().zip(targets) {
        write_document(path, text)?;
        info!(
            "Wrote {} ({} files, {} dirs)",
            path.display(),
            encoded.stats.files,
            encoded.stats.dirs
        );
        written.push(WrittenDocument {
            path: path.display().to_string(),
            format: format.to_string(),
            files: encoded.stats.files,
            dirs: encoded.stats.dirs,
        });
    }

    Ok(written)
}

/// Run the snapshot command
pub fn run_snapshot(
    root: &Path,
    config: &SnapshotConfig,
    targets: &[(DocumentFormat, PathBuf)],
    render_config: RenderConfig,
) -> Result<()> {
    let documents = snapshot_to_files(root, config, targets)?;

    let report = Report::Snapshot {
        root: root.display().to_string(),
        documents,
    };
    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&report));

    Ok(())
}
