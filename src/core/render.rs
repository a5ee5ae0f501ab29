//! Renderer module
//!
//! Renders a Report to the selected output format: text or json

use colored::Colorize;

use crate::core::model::{Report, RestoreReport, WrittenDocument};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a render config with default options
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a render config with pretty printing set
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a report to a string
    pub fn render(&self, report: &Report) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(report),
            OutputFormat::Json => self.render_json(report),
        }
    }

    fn render_json(&self, report: &Report) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    fn render_text(&self, report: &Report) -> String {
        match report {
            Report::Snapshot { root, documents } => render_snapshot_text(root, documents),
            Report::Restore(restore) => render_restore_text(restore),
        }
    }
}

fn render_snapshot_text(root: &str, documents: &[WrittenDocument]) -> String {
    let mut output = format!("{} {}\n", "Snapshot of".bold(), root);
    for doc in documents {
        output.push_str(&format!(
            "  {} {} ({}): {} files, {} dirs\n",
            "wrote".green(),
            doc.path,
            doc.format,
            doc.files,
            doc.dirs
        ));
    }
    output.trim_end().to_string()
}

fn render_restore_text(report: &RestoreReport) -> String {
    let mut output = format!(
        "{} {}\n  {} {}/{} files\n",
        "Restored into".bold(),
        report.target,
        "wrote".green(),
        report.written,
        report.total
    );
    if !report.failures.is_empty() {
        output.push_str(&format!("  {} {} files:\n", "failed".red(), report.failures.len()));
        for failure in &report.failures {
            output.push_str(&format!("    - {}: {}\n", failure.path, failure.message));
        }
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RestoreFailure;

    fn sample_restore() -> Report {
        Report::Restore(RestoreReport {
            target: "/out".to_string(),
            total: 3,
            written: 2,
            failures: vec![RestoreFailure {
                path: "a/b.txt".to_string(),
                message: "Not a directory".to_string(),
            }],
        })
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_json() {
        let renderer = Renderer::with_config(RenderConfig::new(OutputFormat::Json));
        let output = renderer.render(&sample_restore());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "restore");
        assert_eq!(value["total"], 3);
        assert_eq!(value["failures"][0]["path"], "a/b.txt");
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_render_json_pretty() {
        let renderer =
            Renderer::with_config(RenderConfig::with_pretty(OutputFormat::Json, true));
        let output = renderer.render(&sample_restore());
        assert!(output.contains("\n  "));
    }

    #[test]
    fn test_render_text_restore() {
        colored::control::set_override(false);
        let renderer = Renderer::with_config(RenderConfig::new(OutputFormat::Text));
        let output = renderer.render(&sample_restore());
        assert!(output.contains("Restored into /out"));
        assert!(output.contains("wrote 2/3 files"));
        assert!(output.contains("a/b.txt: Not a directory"));
    }

    #[test]
    fn test_render_text_snapshot() {
        colored::control::set_override(false);
        let report = Report::Snapshot {
            root: "/project".to_string(),
            documents: vec![WrittenDocument {
                path: "out/project_content.json".to_string(),
                format: "json".to_string(),
                files: 4,
                dirs: 1,
            }],
        };
        let renderer = Renderer::with_config(RenderConfig::default());
        let output = renderer.render(&report);
        assert!(output.contains("out/project_content.json (json): 4 files, 1 dirs"));
    }
}
