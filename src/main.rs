//! CutScan - Parallel shot-boundary detection for video files
//!
//! # Usage
//!
//! ```bash
//! cutscan scan --input video.mp4
//! cutscan scan --input video.mp4 --workers 8 --threshold 45 --json
//! cutscan probe --input video.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cutscan::cli::{commands, Cli, Commands};

/// Main entry point for the CutScan application
fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; the --log-level flag is the fallback
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.command {
        Commands::Scan(args) => {
            info!("Executing scan command");
            commands::scan(args)?;
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(args)?;
        }
    }

    Ok(())
}
