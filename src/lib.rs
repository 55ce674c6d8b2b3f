//! CutScan - Parallel shot-boundary detection for video files
//!
//! Splits a video's frame range across independent scan workers, each
//! decoding through its own ffmpeg handle and comparing consecutive frames
//! with windowed SSIM. Dips below the similarity threshold pass through a
//! debounce state machine before they are reported as cuts, and worker
//! results are merged in deterministic order.

use std::sync::OnceLock;

pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod probe;
pub mod similarity;
pub mod source;

pub use domain::{CutRecord, FrameRange, Report, ScanRequest, ScanResult};
pub use engine::{run_scan, run_scan_with};
pub use error::{CutScanError, CutScanResult};
pub use probe::{probe_video, VideoInfo};

static FFMPEG_INIT: OnceLock<Result<(), ffmpeg_next::Error>> = OnceLock::new();

/// Initialize the ffmpeg library. Safe to call from every worker; the
/// underlying registration runs once per process.
pub fn init() -> CutScanResult<()> {
    (*FFMPEG_INIT.get_or_init(ffmpeg_next::init))?;
    Ok(())
}
