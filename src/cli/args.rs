//! Command-line argument definitions

use clap::Args;

fn workers_in_range(s: &str) -> Result<usize, String> {
    clap_num::number_range(s, 1, 512)
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Number of parallel scan workers (default: logical CPU count)
    #[arg(short, long, value_parser = workers_in_range)]
    pub workers: Option<usize>,

    /// Similarity threshold in percent; comparisons below it are cut candidates
    #[arg(short, long, default_value_t = 50.0)]
    pub threshold: f64,

    /// Downscale factor applied to frames before comparison
    #[arg(long, default_value_t = 0.1)]
    pub downscale: f64,

    /// Extend worker ranges to close detection blind spots at range boundaries
    #[arg(long)]
    pub overlap: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
