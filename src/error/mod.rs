//! Error handling module for CutScan

use thiserror::Error;

/// Main error type for CutScan operations
#[derive(Error, Debug)]
pub enum CutScanError {
    /// Invalid scan configuration (zero workers, empty video, bad threshold)
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Video file could not be opened for decoding
    #[error("Failed to open video {path}: {message}")]
    VideoOpenFailure { path: String, message: String },

    /// Metadata probe error (frame count, dimensions, stream lookup)
    #[error("Failed to probe video: {message}")]
    ProbeFailure { message: String },

    /// Frame decode error mid-scan; fatal for the affected worker only
    #[error("Failed to decode frame {frame_index}: {message}")]
    FrameDecodeFailure { frame_index: u64, message: String },

    /// A worker exited without delivering a result
    #[error("Worker {worker_id} did not report a result")]
    WorkerLost { worker_id: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg_next::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CutScan operations
pub type CutScanResult<T> = std::result::Result<T, CutScanError>;
