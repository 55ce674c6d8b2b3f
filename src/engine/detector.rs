//! Debounced cut-detection state machine

use crate::domain::CutRecord;

/// Streak-based detector that turns a per-frame similarity signal into
/// confirmed cut records.
///
/// A comparison scoring below the threshold opens a dip. A cut is only
/// confirmed once similarity recovers after exactly one low frame: the
/// record points at that low frame and carries its score. A second
/// consecutive low frame cancels the streak, which suppresses gradual
/// transitions (fades, wipes) that depress similarity across several
/// frames. Scores are in percent, matching the threshold scale.
#[derive(Debug)]
pub struct CutDetector {
    threshold: f64,
    streak: u32,
    last_below: f64,
    cut_counter: u32,
}

impl CutDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            streak: 0,
            last_below: 0.0,
            cut_counter: 1,
        }
    }

    /// Feed the similarity score of the comparison ending at `frame_index`.
    ///
    /// Returns a confirmed cut, if any. The record's frame index is
    /// `frame_index - 1`, the frame whose comparison dipped.
    pub fn observe(&mut self, frame_index: u64, similarity: f64) -> Option<CutRecord> {
        let mut confirmed = None;

        if similarity < self.threshold {
            self.streak += 1;
            self.last_below = similarity;
        } else {
            if self.streak == 1 {
                confirmed = Some(CutRecord {
                    cut_index: self.cut_counter,
                    frame_index: frame_index - 1,
                    similarity: self.last_below,
                });
                self.cut_counter += 1;
            }
            self.streak = 0;
        }

        // Two consecutive low frames reset the streak, so the count only
        // ever tracks dip parity.
        if self.streak == 2 {
            self.streak = 0;
        }

        confirmed
    }
}
