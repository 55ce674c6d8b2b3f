//! Shared test doubles for the scan engine tests

use std::collections::HashMap;

use image::{GrayImage, RgbaImage};

use cutscan::error::{CutScanError, CutScanResult};
use cutscan::similarity::SimilarityScorer;
use cutscan::source::FrameSource;

/// In-memory frame source for a fictional video.
///
/// Frame `i` is a 1-pixel-tall image of width `i`, so a scorer can recover
/// the frame index from the image it receives and the decode path needs no
/// real media.
pub struct SyntheticSource {
    total_frames: u64,
    /// 1-based index the next read delivers
    next: u64,
    /// Reads fail from this frame onward, when set
    fail_from: Option<u64>,
}

impl SyntheticSource {
    pub fn new(total_frames: u64) -> Self {
        Self {
            total_frames,
            next: 1,
            fail_from: None,
        }
    }

    pub fn failing_from(total_frames: u64, frame_index: u64) -> Self {
        Self {
            total_frames,
            next: 1,
            fail_from: Some(frame_index),
        }
    }
}

impl FrameSource for SyntheticSource {
    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.total_frames as u32, 1)
    }

    fn seek(&mut self, frame_index: u64) -> CutScanResult<()> {
        self.next = frame_index;
        Ok(())
    }

    fn read_next(&mut self) -> CutScanResult<Option<RgbaImage>> {
        if let Some(fail_from) = self.fail_from {
            if self.next >= fail_from {
                return Err(CutScanError::FrameDecodeFailure {
                    frame_index: self.next,
                    message: "Injected decode failure".to_string(),
                });
            }
        }
        if self.next > self.total_frames {
            return Ok(None);
        }
        let frame = RgbaImage::new(self.next as u32, 1);
        self.next += 1;
        Ok(Some(frame))
    }
}

/// Scorer driven by a script of per-comparison scores.
///
/// The key is the index of the later frame in the pair, recovered from the
/// width that [`SyntheticSource`] encodes. Unscripted comparisons score as
/// identical. Scores are fractions in [0, 1], scaled to percent by the
/// scanner.
pub struct ScriptedScorer {
    scores: HashMap<u64, f64>,
}

impl ScriptedScorer {
    pub fn new(scores: &[(u64, f64)]) -> Self {
        Self {
            scores: scores.iter().copied().collect(),
        }
    }

    /// Script where every listed frame index dips to the given fraction
    pub fn dipping_at(frame_indices: &[u64], score: f64) -> Self {
        Self::new(
            &frame_indices
                .iter()
                .map(|&i| (i, score))
                .collect::<Vec<_>>(),
        )
    }
}

impl SimilarityScorer for ScriptedScorer {
    fn score(&self, _a: &GrayImage, b: &GrayImage) -> f64 {
        self.scores.get(&(b.width() as u64)).copied().unwrap_or(1.0)
    }
}
