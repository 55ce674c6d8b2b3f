//! Per-worker frame-range scanning

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::domain::{CutRecord, FrameRange, ScanResult};
use crate::engine::detector::CutDetector;
use crate::error::{CutScanError, CutScanResult};
use crate::similarity::SimilarityScorer;
use crate::source::{to_grayscale, FrameSource};

/// Scan one frame range for cuts using a private source handle.
///
/// Seeks to the first frame of the range, then compares each consecutive
/// frame pair through the debounce detector. Scores are scaled to percent
/// before detection. Never panics; a mid-range failure seals the result
/// with the error message while keeping the cuts found so far.
pub fn scan_range<S, C>(
    mut source: S,
    scorer: &C,
    worker_id: usize,
    range: FrameRange,
    threshold: f64,
    stop: &AtomicBool,
) -> ScanResult
where
    S: FrameSource,
    C: SimilarityScorer + ?Sized,
{
    let mut result = ScanResult::empty(worker_id, range);

    if range.is_empty() {
        debug!(worker_id, %range, "Empty range, nothing to scan");
        return result;
    }

    debug!(worker_id, %range, "Scanning range");
    if let Err(e) = scan_inner(&mut source, scorer, range, threshold, stop, &mut result.cuts) {
        warn!(worker_id, %range, error = %e, "Scan aborted");
        result.error = Some(e.to_string());
    }

    result
}

fn scan_inner<S, C>(
    source: &mut S,
    scorer: &C,
    range: FrameRange,
    threshold: f64,
    stop: &AtomicBool,
    cuts: &mut Vec<CutRecord>,
) -> CutScanResult<()>
where
    S: FrameSource,
    C: SimilarityScorer + ?Sized,
{
    source.seek(range.start)?;

    let first = source
        .read_next()?
        .ok_or_else(|| CutScanError::FrameDecodeFailure {
            frame_index: range.start,
            message: "Unexpected end of stream".to_string(),
        })?;
    let mut previous = to_grayscale(&first);

    let mut detector = CutDetector::new(threshold);

    for frame_index in range.start + 1..=range.end {
        if stop.load(Ordering::Relaxed) {
            debug!(frame_index, "Stop requested, sealing partial result");
            break;
        }

        let frame = source
            .read_next()?
            .ok_or_else(|| CutScanError::FrameDecodeFailure {
                frame_index,
                message: "Unexpected end of stream".to_string(),
            })?;
        let current = to_grayscale(&frame);

        let similarity = scorer.score(&previous, &current) * 100.0;
        if let Some(cut) = detector.observe(frame_index, similarity) {
            info!(
                frame_index = cut.frame_index,
                similarity = cut.similarity,
                "Cut detected"
            );
            cuts.push(cut);
        }

        previous = current;
    }

    Ok(())
}
