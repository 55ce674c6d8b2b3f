//! Frame-range partitioning across scan workers

use tracing::debug;

use crate::domain::FrameRange;
use crate::error::{CutScanError, CutScanResult};

/// Split `[1, total_frames]` into `worker_count` contiguous ranges.
///
/// The division is real-valued so the final worker's end boundary lands on
/// the true last frame even when `total_frames` is not evenly divisible;
/// both bounds are truncated to integers. When `worker_count` exceeds
/// `total_frames` the surplus workers receive empty ranges (`start > end`),
/// which scan as no-ops.
pub fn partition(total_frames: u64, worker_count: usize) -> CutScanResult<Vec<FrameRange>> {
    if worker_count == 0 {
        return Err(CutScanError::InvalidConfiguration {
            message: "Worker count must be positive".to_string(),
        });
    }
    if total_frames == 0 {
        return Err(CutScanError::InvalidConfiguration {
            message: "Video reports zero frames".to_string(),
        });
    }

    let division = total_frames as f64 / worker_count as f64;
    let mut ranges = Vec::with_capacity(worker_count);

    for k in 1..=worker_count {
        let start = (division * (k - 1) as f64 + 1.0) as u64;
        // Truncating division * worker_count can drift one below the true
        // last frame; the final range must end exactly there.
        let end = if k == worker_count {
            total_frames
        } else {
            (division * k as f64) as u64
        };
        ranges.push(FrameRange::new(start, end));
    }

    debug!(
        total_frames,
        worker_count,
        "Partitioned frames into {} ranges",
        ranges.len()
    );

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert that ranges cover [1, total] exactly once, in order, with no
    /// gaps or overlaps.
    fn assert_exact_cover(ranges: &[FrameRange], total: u64) {
        let mut next_expected = 1;
        for range in ranges {
            if range.is_empty() {
                continue;
            }
            assert_eq!(
                range.start, next_expected,
                "range {} leaves a gap or overlap",
                range
            );
            next_expected = range.end + 1;
        }
        assert_eq!(next_expected, total + 1, "ranges do not end at frame {}", total);
    }

    #[test]
    fn test_partition_even_division() {
        let ranges = partition(300, 4).unwrap();
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[0], FrameRange::new(1, 75));
        assert_eq!(ranges[1], FrameRange::new(76, 150));
        assert_eq!(ranges[2], FrameRange::new(151, 225));
        assert_eq!(ranges[3], FrameRange::new(226, 300));
        assert_exact_cover(&ranges, 300);
    }

    #[test]
    fn test_partition_uneven_division() {
        let ranges = partition(10, 3).unwrap();
        assert_eq!(ranges.len(), 3);
        // division = 3.333..: truncation must still land the last end on 10
        assert_eq!(ranges[2].end, 10);
        assert_exact_cover(&ranges, 10);
    }

    #[test]
    fn test_partition_covers_exactly_for_many_shapes() {
        for total in [1, 2, 7, 29, 100, 299, 300, 301, 1000, 12345] {
            for workers in [1, 2, 3, 4, 5, 7, 8, 16, 30] {
                let ranges = partition(total, workers).unwrap();
                assert_eq!(ranges.len(), workers);
                assert_exact_cover(&ranges, total);
            }
        }
    }

    #[test]
    fn test_partition_single_worker() {
        let ranges = partition(42, 1).unwrap();
        assert_eq!(ranges, vec![FrameRange::new(1, 42)]);
    }

    #[test]
    fn test_partition_more_workers_than_frames() {
        let ranges = partition(3, 8).unwrap();
        assert_eq!(ranges.len(), 8);
        assert_exact_cover(&ranges, 3);
        // Surplus workers degrade to empty ranges rather than looping
        assert!(ranges.iter().filter(|r| r.is_empty()).count() >= 5);
        for range in &ranges {
            assert!(range.end <= 3 || range.is_empty());
        }
    }

    #[test]
    fn test_partition_rejects_zero_workers() {
        assert!(matches!(
            partition(100, 0),
            Err(CutScanError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_partition_rejects_zero_frames() {
        assert!(matches!(
            partition(0, 4),
            Err(CutScanError::InvalidConfiguration { .. })
        ));
    }
}
