//! chatviz - Main Entry Point

use anyhow::Result;
use chatviz::Args;
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    let summary = chatviz::run(args)?;
    info!("Wrote {} files", summary.written.len());
    Ok(())
}
