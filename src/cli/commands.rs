//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{ProbeArgs, ScanArgs};
use crate::domain::ScanRequest;
use crate::engine::run_scan;
use crate::output;
use crate::probe::probe_video;

/// Execute the scan command
pub fn scan(args: ScanArgs) -> Result<()> {
    info!("Starting scan operation");
    info!("Input: {}", args.input);

    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let workers = args.workers.unwrap_or_else(num_cpus::get);
    info!("Workers: {}", workers);

    let mut request = ScanRequest::new(&args.input, workers)
        .and_then(|r| r.with_threshold(args.threshold))
        .and_then(|r| r.with_downscale(args.downscale))
        .context("Invalid scan configuration")?;
    if args.overlap {
        request = request.with_overlap();
    }

    let report = run_scan(&request).context("Scan failed")?;

    if args.json {
        println!("{}", output::render_json(&report)?);
    } else {
        print!("{}", output::render_text(&report));
    }

    if !report.is_complete() {
        return Err(anyhow::anyhow!(
            "Workers {:?} failed; report is incomplete",
            report.failed_workers()
        ));
    }

    Ok(())
}

/// Execute the probe command
pub fn probe(args: ProbeArgs) -> Result<()> {
    info!("Probing {}", args.input);

    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let info = probe_video(&args.input).context("Failed to probe input file")?;

    if args.json {
        println!("{}", output::render_video_info_json(&info)?);
    } else {
        print!("{}", output::render_video_info(&info));
    }

    Ok(())
}
