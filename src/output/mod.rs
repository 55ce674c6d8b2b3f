//! Report rendering for terminal and JSON consumption

use std::fmt::Write;

use crate::domain::Report;
use crate::error::CutScanResult;
use crate::probe::VideoInfo;

/// Render a scan report as human-readable text, one section per worker.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    for result in &report.results {
        match &result.error {
            Some(message) => {
                let _ = writeln!(
                    out,
                    "worker {} {}: scan failed: {}",
                    result.worker_id, result.range, message
                );
            }
            None if result.cuts.is_empty() => {
                let _ = writeln!(
                    out,
                    "worker {} {}: no cuts found",
                    result.worker_id, result.range
                );
            }
            None => {
                let _ = writeln!(out, "worker {} {}:", result.worker_id, result.range);
                for cut in &result.cuts {
                    let _ = writeln!(out, "  {}", cut);
                }
            }
        }
    }

    let _ = writeln!(out, "total cuts: {}", report.total_cuts());
    let _ = writeln!(out, "--- {:.3} seconds ---", report.elapsed.as_secs_f64());
    out
}

/// Render a scan report as pretty-printed JSON
pub fn render_json(report: &Report) -> CutScanResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render probed video metadata as human-readable text
pub fn render_video_info(info: &VideoInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "path:         {}", info.path);
    let _ = writeln!(out, "frames:       {}", info.total_frames);
    let _ = writeln!(out, "resolution:   {}x{}", info.width, info.height);
    let _ = writeln!(out, "frame rate:   {:.3} fps", info.frame_rate);
    out
}

/// Render probed video metadata as pretty-printed JSON
pub fn render_video_info_json(info: &VideoInfo) -> CutScanResult<String> {
    Ok(serde_json::to_string_pretty(info)?)
}
