//! Frame source port - decoded-frame access consumed by the scan engine
//!
//! Every worker opens its own source through a [`SourceFactory`]; decoders
//! are never shared between concurrent readers.

use image::{GrayImage, RgbaImage};

use crate::error::CutScanResult;

pub mod ffmpeg;

pub use ffmpeg::FfmpegFrameSource;

/// Random-access provider of decoded color frames for one open video.
///
/// Frame indices are 1-based throughout.
pub trait FrameSource {
    /// Total number of frames in the video
    fn total_frames(&self) -> u64;

    /// Pixel dimensions of delivered frames (after any downscaling)
    fn dimensions(&self) -> (u32, u32);

    /// Position the source so the next read delivers `frame_index`
    fn seek(&mut self, frame_index: u64) -> CutScanResult<()>;

    /// Decode and return the next frame, or `None` at end of stream
    fn read_next(&mut self) -> CutScanResult<Option<RgbaImage>>;
}

/// Factory seam through which each worker opens its own private
/// [`FrameSource`] handle.
///
/// Implemented for any `Fn() -> CutScanResult<S>` closure, which is how the
/// production ffmpeg opener and the synthetic test sources both plug in.
pub trait SourceFactory: Send + Sync {
    type Source: FrameSource;

    fn open(&self) -> CutScanResult<Self::Source>;
}

impl<S, F> SourceFactory for F
where
    S: FrameSource,
    F: Fn() -> CutScanResult<S> + Send + Sync,
{
    type Source = S;

    fn open(&self) -> CutScanResult<S> {
        self()
    }
}

/// Convert a decoded color frame to grayscale. Pure pixel transform.
pub fn to_grayscale(frame: &RgbaImage) -> GrayImage {
    image::imageops::grayscale(frame)
}
