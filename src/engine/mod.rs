//! Scan engine - cut detection state machine, per-worker scanning, and
//! the parallel aggregation pipeline

pub mod aggregator;
pub mod detector;
pub mod scanner;

pub use aggregator::{run_scan, run_scan_with};
pub use detector::CutDetector;
pub use scanner::scan_range;
