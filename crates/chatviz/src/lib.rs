//! # chatviz
//!
//! Command line front end: parses arguments, loads configuration, starts
//! logging and runs the report over a live-chat export.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use anyhow::{Context, Result};
use chatviz_common::{init_logging, load_export};
use chatviz_config::{Config, ConfigLoader};
use chatviz_graphs::{GraphManager, ReportSummary};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Live-chat export to read
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory the charts are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Write every computed aggregate to this JSON file
    #[arg(long)]
    pub aggregates: Option<String>,

    /// Log level (trace, debug, info, warn, error) [default: info]
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Overlay the flags that were given onto `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(path) = &self.aggregates {
            config.output.aggregates_path = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Resolve the final configuration: file and environment, then flags
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config =
        ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_to(&mut config);
    config
        .validate_all()
        .context("Invalid configuration after command line overrides")?;
    Ok(config)
}

/// Load the export and write every enabled chart
pub fn run_report(config: Config) -> Result<ReportSummary> {
    let input = config.input_path();
    let table = load_export(&input)
        .with_context(|| format!("Failed to load export {}", input.display()))?;

    let report = table.report();
    info!(
        rows = table.len(),
        dated = table.dated_len(),
        unparsed_timestamps = report.unparsed_timestamps,
        invalid_like_counts = report.invalid_like_counts,
        "export loaded"
    );

    GraphManager::new(config)
        .generate_all(&table)
        .context("Report generation failed")
}

/// Full program: configuration, logging, report
pub fn run(args: Args) -> Result<ReportSummary> {
    let config = resolve_config(&args)?;
    init_logging(&config.logging_config()).context("Failed to initialize logging")?;
    info!("Starting chatviz v{}", env!("CARGO_PKG_VERSION"));

    run_report(config)
}
