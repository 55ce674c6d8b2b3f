//! Video metadata probing

use ffmpeg_next as ffmpeg;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CutScanError, CutScanResult};

/// Metadata extracted from a video file before scanning starts
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub path: String,
    pub total_frames: u64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Timing values derived from one video stream.
///
/// Shared by the probe and the decoding source so the fallback chain
/// cannot drift between the two paths.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StreamTiming {
    pub(crate) time_base: f64,
    pub(crate) frame_rate: f64,
    pub(crate) total_frames: u64,
}

impl StreamTiming {
    pub(crate) fn of(
        stream: &ffmpeg::format::stream::Stream<'_>,
        container_duration: i64,
    ) -> Self {
        let tb = stream.time_base();
        let rate = stream.avg_frame_rate();
        Self::derive(
            tb.numerator() as f64 / tb.denominator() as f64,
            rate.numerator(),
            rate.denominator(),
            stream.frames(),
            stream.duration(),
            container_duration,
        )
    }

    /// Frame count prefers the container's own value, then stream duration
    /// times rate, then format-level duration times rate.
    fn derive(
        time_base: f64,
        rate_num: i32,
        rate_den: i32,
        frames: i64,
        stream_duration: i64,
        container_duration: i64,
    ) -> Self {
        let frame_rate = if rate_num > 0 && rate_den > 0 {
            rate_num as f64 / rate_den as f64
        } else {
            warn!("Stream reports no frame rate, assuming 25 fps");
            25.0
        };

        let total_frames = if frames > 0 {
            frames as u64
        } else if stream_duration > 0 {
            (stream_duration as f64 * time_base * frame_rate).round() as u64
        } else {
            let seconds = container_duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE);
            (seconds * frame_rate).round() as u64
        };

        Self {
            time_base,
            frame_rate,
            total_frames,
        }
    }
}

/// Probe a video file for the metadata the scan pipeline needs.
pub fn probe_video(path: &str) -> CutScanResult<VideoInfo> {
    crate::init()?;

    let input = ffmpeg::format::input(&path).map_err(|e| CutScanError::VideoOpenFailure {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let stream = input
        .streams()
        .best(ffmpeg::media::Type::Video)
        .ok_or_else(|| CutScanError::ProbeFailure {
            message: format!("No video stream in {}", path),
        })?;

    let timing = StreamTiming::of(&stream, input.duration());

    let decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?
        .decoder()
        .video()?;

    let info = VideoInfo {
        path: path.to_string(),
        total_frames: timing.total_frames,
        width: decoder.width(),
        height: decoder.height(),
        frame_rate: timing.frame_rate,
    };

    debug!(
        path,
        total_frames = info.total_frames,
        width = info.width,
        height = info.height,
        frame_rate = info.frame_rate,
        "Probed video"
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_prefers_container_frame_count() {
        let timing = StreamTiming::derive(1.0 / 12800.0, 30000, 1001, 300, 128_000, 0);
        assert_eq!(timing.total_frames, 300);
    }

    #[test]
    fn test_timing_falls_back_to_stream_duration() {
        // 10 s at 25 fps in a 1/1000 time base
        let timing = StreamTiming::derive(0.001, 25, 1, 0, 10_000, 0);
        assert_eq!(timing.total_frames, 250);
        assert_eq!(timing.frame_rate, 25.0);
    }

    #[test]
    fn test_timing_falls_back_to_container_duration() {
        // 4 s of AV_TIME_BASE units at 30 fps
        let duration = 4 * i64::from(ffmpeg::ffi::AV_TIME_BASE);
        let timing = StreamTiming::derive(0.001, 30, 1, 0, 0, duration);
        assert_eq!(timing.total_frames, 120);
    }

    #[test]
    fn test_timing_assumes_25_fps_without_a_rate() {
        let timing = StreamTiming::derive(0.001, 0, 0, 0, 2_000, 0);
        assert_eq!(timing.frame_rate, 25.0);
        assert_eq!(timing.total_frames, 50);
    }
}
