//! snaptree - capture a directory tree into one document and restore it again
//!
//! snaptree provides:
//! - Tree walking with directory-name and extension ignore rules
//! - Binary detection and a UTF-8 → GBK → lossy decode chain
//! - JSON (path → content) and XML (one element per file) documents
//! - Restoring either document back into files

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backends;
mod cli;
mod core;
mod flows;
mod formats;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    cli::run(cli)
}
