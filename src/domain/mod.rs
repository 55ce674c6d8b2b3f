//! Domain models - Core types and data structures

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CutScanError, CutScanResult};

/// Default similarity threshold below which a frame pair is a cut candidate
pub const DEFAULT_CUT_THRESHOLD: f64 = 50.0;

/// Default downscale factor applied to frames before comparison
pub const DEFAULT_DOWNSCALE: f64 = 0.1;

/// Contiguous span of 1-based frame indices assigned to one worker.
///
/// Both bounds are inclusive. A range with `start > end` is empty and scans
/// as a no-op (this happens when there are more workers than frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: u64,
    pub end: u64,
}

impl FrameRange {
    /// Create a new frame range
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Whether this range contains no frames
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of frames in the range
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Whether the given frame index falls inside the range
    pub fn contains(&self, frame_index: u64) -> bool {
        frame_index >= self.start && frame_index <= self.end
    }
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// One detected hard cut, immutable once produced by a worker.
///
/// `frame_index` is the frame whose comparison against its predecessor
/// dipped below the threshold; `similarity` is that dipped score in
/// percent (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRecord {
    /// Per-worker sequence number, starting at 1
    pub cut_index: u32,
    /// 1-based frame index of the low-similarity comparison
    pub frame_index: u64,
    /// Dipped similarity score in percent
    pub similarity: f64,
}

impl fmt::Display for CutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cut: {}, frame: {}, similarity: {:.1}%",
            self.cut_index, self.frame_index, self.similarity
        )
    }
}

/// Sealed outcome of one worker's scan over its frame range.
///
/// Cuts already detected are kept even when the scan failed mid-range, so
/// a decode error never silently discards earlier results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub worker_id: usize,
    pub range: FrameRange,
    pub cuts: Vec<CutRecord>,
    /// Present when the scan aborted; rendered verbatim in the report
    pub error: Option<String>,
}

impl ScanResult {
    /// Create an empty, successful result for a range
    pub fn empty(worker_id: usize, range: FrameRange) -> Self {
        Self {
            worker_id,
            range,
            cuts: Vec::new(),
            error: None,
        }
    }

    /// Whether this worker's scan aborted with an error
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Final artifact of one run: all worker results in worker-index order
/// plus the wall-clock duration from spawn to full collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub results: Vec<ScanResult>,
    pub elapsed: Duration,
}

impl Report {
    /// Total number of cuts across all workers
    pub fn total_cuts(&self) -> usize {
        self.results.iter().map(|r| r.cuts.len()).sum()
    }

    /// Worker ids whose scans aborted with an error
    pub fn failed_workers(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| r.worker_id)
            .collect()
    }

    /// Whether every worker completed without error
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(|r| !r.is_failed())
    }
}

/// Immutable scan configuration, validated once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Path to the video file
    pub path: String,
    /// Number of parallel scan workers
    pub worker_count: usize,
    /// Similarity threshold in percent; scores below it are cut candidates
    pub threshold: f64,
    /// Downscale factor in (0, 1] applied to frames before comparison
    pub downscale: f64,
    /// Extend non-final ranges by two frames and de-duplicate at merge
    /// time, closing the detection blind spot at range boundaries
    pub overlap: bool,
}

impl ScanRequest {
    /// Create a new scan request with default threshold and downscale
    pub fn new(path: impl Into<String>, worker_count: usize) -> CutScanResult<Self> {
        let request = Self {
            path: path.into(),
            worker_count,
            threshold: DEFAULT_CUT_THRESHOLD,
            downscale: DEFAULT_DOWNSCALE,
            overlap: false,
        };
        request.validate()?;
        Ok(request)
    }

    /// Set the similarity threshold
    pub fn with_threshold(mut self, threshold: f64) -> CutScanResult<Self> {
        self.threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    /// Set the downscale factor
    pub fn with_downscale(mut self, downscale: f64) -> CutScanResult<Self> {
        self.downscale = downscale;
        self.validate()?;
        Ok(self)
    }

    /// Enable range overlap at worker boundaries with merge-time
    /// de-duplication
    pub fn with_overlap(mut self) -> Self {
        self.overlap = true;
        self
    }

    fn validate(&self) -> CutScanResult<()> {
        if self.path.is_empty() {
            return Err(CutScanError::InvalidConfiguration {
                message: "Video path cannot be empty".to_string(),
            });
        }
        if self.worker_count == 0 {
            return Err(CutScanError::InvalidConfiguration {
                message: "Worker count must be positive".to_string(),
            });
        }
        if !(self.threshold > 0.0 && self.threshold <= 100.0) {
            return Err(CutScanError::InvalidConfiguration {
                message: format!(
                    "Threshold must be in (0, 100], got {}",
                    self.threshold
                ),
            });
        }
        if !(self.downscale > 0.0 && self.downscale <= 1.0) {
            return Err(CutScanError::InvalidConfiguration {
                message: format!(
                    "Downscale factor must be in (0, 1], got {}",
                    self.downscale
                ),
            });
        }
        Ok(())
    }
}
