//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::SnapshotConfig;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::flows::snapshot::FormatChoice;

/// snaptree - capture a directory tree into one document and restore it again.
#[derive(Parser, Debug)]
#[command(name = "snaptree")]
#[command(
    author,
    version,
    about,
    long_about = r#"snaptree captures every file under a directory into a single portable
document and can rebuild the tree from that document later.

Document formats:
- json: a flat object mapping relative paths to file contents
- xml: one <file path="..."> element per file, content in CDATA when possible

Binary files (by ignored extension or a null byte in the first 2 KB) are
stored as the literal "Binary File CANNOT Be Read". Empty directories are not
recorded.

Examples:
    snaptree --root my-project snapshot
    snaptree --root my-project snapshot --format both --out-dir snapshots
    snaptree snapshot --output snap.xml --ignore-dir target --ignore-ext .lock
    snaptree restore snapshots/project_content.json --target restored
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
snapshot walks this directory; restore writes into it unless --target is given."
    )]
    pub root: PathBuf,

    /// JSON config file with ignore rules and output file names.
    #[arg(
        long,
        global = true,
        env = "SNAPTREE_CONFIG",
        value_name = "FILE",
        long_help = "JSON config file. Recognized keys:\n\
- ignore_dirs: directory names pruned at any depth\n\
- ignore_extensions: extensions always treated as binary (e.g. \".png\")\n\
- json_file / xml_file: default document file names\n\n\
Missing keys keep their built-in defaults."
    )]
    pub config: Option<PathBuf>,

    /// Report format (text/json).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_name = "FORMAT",
        value_parser = ["text", "json"],
        long_help = "Select how the final report is printed on stdout.\n\n\
Supported values:\n\
- text (default)\n\
- json"
    )]
    pub report: String,

    /// Pretty-print JSON reports with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (per-entry diagnostics and progress on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture the tree under ROOT into a document.
    #[command(
        long_about = "Walk ROOT once, classify every file as text or binary and write the\n\
selected document(s).\n\n\
Examples:\n\
  snaptree snapshot\n\
  snaptree snapshot --format xml --out-dir build\n\
  snaptree snapshot --output snap.json --no-default-ignores\n"
    )]
    Snapshot {
        /// Write a single document to this path (format from its extension).
        #[arg(long, value_name = "FILE", conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory receiving documents named after the config.
        #[arg(long, default_value = ".", value_name = "DIR")]
        out_dir: PathBuf,

        /// Document format (json/xml/both).
        #[arg(
            long,
            value_name = "FORMAT",
            value_parser = ["json", "xml", "both"],
            long_help = "Document format to produce.\n\n\
Supported values:\n\
- json (default)\n\
- xml\n\
- both: one walk, two documents"
        )]
        format: Option<String>,

        /// Additional directory name to prune (repeatable).
        #[arg(long = "ignore-dir", value_name = "NAME")]
        ignore_dirs: Vec<String>,

        /// Additional extension to treat as binary (repeatable).
        #[arg(long = "ignore-ext", value_name = "EXT")]
        ignore_exts: Vec<String>,

        /// Start from empty ignore sets instead of the defaults.
        #[arg(long)]
        no_default_ignores: bool,
    },

    /// Rebuild files from a .json or .xml document.
    #[command(
        long_about = "Parse DOCUMENT (format chosen by its extension) and write every file it\n\
contains under the target directory, creating parent directories as needed and\n\
overwriting existing files.\n\n\
Files that cannot be written are reported and skipped; the rest are still\n\
restored.\n\n\
Examples:\n\
  snaptree restore project_content.json --target restored\n\
  snaptree --root restored restore project_content.xml\n"
    )]
    Restore {
        /// Document to restore from.
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Directory to restore into (defaults to ROOT).
        #[arg(long, value_name = "DIR")]
        target: Option<PathBuf>,
    },
}

impl Cli {
    /// Log filter used when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    fn load_config(&self) -> Result<SnapshotConfig> {
        match &self.config {
            Some(path) => SnapshotConfig::load(path)
                .with_context(|| format!("Failed to load config: {:?}", path)),
            None => Ok(SnapshotConfig::default()),
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.report.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let mut config = cli.load_config()?;

    match cli.command {
        Commands::Snapshot {
            output,
            out_dir,
            format,
            ignore_dirs,
            ignore_exts,
            no_default_ignores,
        } => {
            if no_default_ignores {
                config.ignore_dirs.clear();
                config.ignore_extensions.clear();
            }
            config.extend(&ignore_dirs, &ignore_exts);

            let choice = format
                .as_deref()
                .map(str::parse::<FormatChoice>)
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let targets = crate::flows::snapshot::resolve_targets(
                output.as_deref(),
                &out_dir,
                choice,
                &config,
            )?;

            let root = cli.root.canonicalize().unwrap_or(cli.root);
            crate::flows::snapshot::run_snapshot(&root, &config, &targets, render_config)
        }

        Commands::Restore { document, target } => {
            let target = target.unwrap_or(cli.root);
            crate::flows::restore::run_restore(&document, &target, render_config)
        }
    }
}
