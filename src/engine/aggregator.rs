//! Parallel scan orchestration - spawn, collect, merge

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use crate::domain::{Report, ScanRequest, ScanResult};
use crate::engine::scanner::scan_range;
use crate::error::{CutScanError, CutScanResult};
use crate::planner::partition;
use crate::probe::probe_video;
use crate::similarity::{SimilarityScorer, SsimScorer};
use crate::source::{FfmpegFrameSource, SourceFactory};

/// Run a full parallel scan against the video named by the request.
///
/// Probes the video for its frame count, then fans the frame range out
/// across the configured number of workers, each decoding through its own
/// ffmpeg handle and scoring with windowed SSIM.
pub fn run_scan(request: &ScanRequest) -> CutScanResult<Report> {
    let video = probe_video(&request.path)?;
    info!(
        path = %request.path,
        total_frames = video.total_frames,
        workers = request.worker_count,
        "Starting scan"
    );

    let factory = FfmpegFrameSource::factory(request.path.clone(), request.downscale);
    let scorer = SsimScorer::default();
    run_scan_with(request, video.total_frames, &factory, &scorer)
}

/// Run the parallel scan with explicit source and scorer collaborators.
///
/// Workers are scoped threads; each sends exactly one sealed [`ScanResult`]
/// over a channel, and collection blocks until every worker has reported,
/// however long the scan takes. Results are merged in worker-index order
/// regardless of arrival order, so repeated runs over the same input
/// produce identical reports. A worker whose source fails to open or that
/// panics mid-scan contributes a failed result rather than aborting the
/// run; [`CutScanError::WorkerLost`] is reserved for a worker that drops
/// its channel endpoint without ever reporting.
pub fn run_scan_with<F, C>(
    request: &ScanRequest,
    total_frames: u64,
    factory: &F,
    scorer: &C,
) -> CutScanResult<Report>
where
    F: SourceFactory,
    C: SimilarityScorer,
{
    let mut ranges = partition(total_frames, request.worker_count)?;

    if request.overlap {
        // Extend every non-final range by two frames: one so the pair
        // straddling the boundary is compared at all, and one more so that
        // comparison has its recovery comparison inside the same worker's
        // range and can confirm.
        for k in 0..ranges.len().saturating_sub(1) {
            if !ranges[k].is_empty() {
                ranges[k].end = (ranges[k].end + 2).min(total_frames);
            }
        }
    }

    let worker_count = ranges.len();
    let stop = AtomicBool::new(false);
    let started = Instant::now();

    let mut results = thread::scope(|scope| -> CutScanResult<Vec<ScanResult>> {
        let (tx, rx) = mpsc::channel::<ScanResult>();

        for (worker_id, range) in ranges.iter().enumerate() {
            let tx = tx.clone();
            let stop = &stop;
            let range = *range;
            scope.spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| match factory.open() {
                    Ok(source) => {
                        scan_range(source, scorer, worker_id, range, request.threshold, stop)
                    }
                    Err(e) => {
                        warn!(worker_id, error = %e, "Worker could not open its source");
                        let mut failed = ScanResult::empty(worker_id, range);
                        failed.error = Some(e.to_string());
                        failed
                    }
                }))
                .unwrap_or_else(|_| {
                    // Sealed here so the scope join does not re-panic and
                    // the siblings' results survive
                    warn!(worker_id, "Worker panicked mid-scan");
                    let mut failed = ScanResult::empty(worker_id, range);
                    failed.error = Some("worker panicked".to_string());
                    failed
                });
                // Collection may already have given up on this run
                let _ = tx.send(result);
            });
        }
        drop(tx);

        let mut slots: Vec<Option<ScanResult>> = (0..worker_count).map(|_| None).collect();
        for _ in 0..worker_count {
            match rx.recv() {
                Ok(result) => {
                    let worker_id = result.worker_id;
                    slots[worker_id] = Some(result);
                }
                // Disconnected: a worker dropped its sender without ever
                // reporting. Workers that merely run long keep us blocked
                // here, which is the contract.
                Err(_) => {
                    stop.store(true, Ordering::Relaxed);
                    let worker_id = slots
                        .iter()
                        .position(|slot| slot.is_none())
                        .unwrap_or_default();
                    return Err(CutScanError::WorkerLost { worker_id });
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    })?;

    if request.overlap {
        dedup_boundary_cuts(&mut results);
    }

    let report = Report {
        results,
        elapsed: started.elapsed(),
    };
    info!(
        total_cuts = report.total_cuts(),
        elapsed_secs = report.elapsed.as_secs_f64(),
        "Scan complete"
    );
    Ok(report)
}

/// Drop a cut reported by both sides of an extended range boundary.
///
/// Exact index arithmetic keeps worker emissions disjoint, but sources
/// that derive frame indices from pts can land a seek one frame early and
/// re-confirm the cut the extending worker already reported; the
/// successor's copy is the duplicate.
fn dedup_boundary_cuts(results: &mut [ScanResult]) {
    for k in 1..results.len() {
        let Some(last) = results[k - 1].cuts.last().map(|c| c.frame_index) else {
            continue;
        };
        if results[k].cuts.first().map(|c| c.frame_index) == Some(last) {
            results[k].cuts.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CutRecord, FrameRange};

    fn result_with_cuts(worker_id: usize, frames: &[u64]) -> ScanResult {
        let mut result = ScanResult::empty(worker_id, FrameRange::new(1, 100));
        for (i, &frame_index) in frames.iter().enumerate() {
            result.cuts.push(CutRecord {
                cut_index: i as u32 + 1,
                frame_index,
                similarity: 10.0,
            });
        }
        result
    }

    #[test]
    fn test_dedup_removes_shared_boundary_cut() {
        let mut results = vec![result_with_cuts(0, &[40, 75]), result_with_cuts(1, &[75, 120])];
        dedup_boundary_cuts(&mut results);
        assert_eq!(results[0].cuts.len(), 2);
        assert_eq!(results[1].cuts.len(), 1);
        assert_eq!(results[1].cuts[0].frame_index, 120);
    }

    #[test]
    fn test_dedup_keeps_distinct_cuts() {
        let mut results = vec![result_with_cuts(0, &[40]), result_with_cuts(1, &[80])];
        dedup_boundary_cuts(&mut results);
        assert_eq!(results[0].cuts.len(), 1);
        assert_eq!(results[1].cuts.len(), 1);
    }

    #[test]
    fn test_dedup_skips_empty_neighbours() {
        let mut results = vec![result_with_cuts(0, &[]), result_with_cuts(1, &[80])];
        dedup_boundary_cuts(&mut results);
        assert_eq!(results[1].cuts.len(), 1);
    }
}
