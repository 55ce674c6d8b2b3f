//! FFmpeg-backed frame source adapter

use ffmpeg_next as ffmpeg;
use image::RgbaImage;
use tracing::debug;

use crate::error::{CutScanError, CutScanResult};
use crate::probe::StreamTiming;
use crate::source::{FrameSource, SourceFactory};

/// Frame source decoding one video file through ffmpeg.
///
/// Frames are converted to RGBA and downscaled inside the scaler, so the
/// comparison cost scales with the configured factor rather than the native
/// resolution (the classic tradeoff is scanning at 10% scale).
pub struct FfmpegFrameSource {
    input: ffmpeg::format::context::Input,
    decoder: ffmpeg::codec::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    stream_index: usize,
    time_base: f64,
    frame_rate: f64,
    total_frames: u64,
    scaled_width: u32,
    scaled_height: u32,
    /// 1-based index of the most recently decoded frame
    position: u64,
    /// Frame decoded past the seek target, delivered by the next read
    pending: Option<RgbaImage>,
    eof_sent: bool,
}

impl FfmpegFrameSource {
    /// Open a video file and prepare a downscaling decoder for it
    pub fn open(path: &str, downscale: f64) -> CutScanResult<Self> {
        crate::init()?;

        let input = ffmpeg::format::input(&path).map_err(|e| CutScanError::VideoOpenFailure {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let (stream_index, timing, parameters) = {
            let stream = input
                .streams()
                .best(ffmpeg::media::Type::Video)
                .ok_or_else(|| CutScanError::VideoOpenFailure {
                    path: path.to_string(),
                    message: "No video stream found".to_string(),
                })?;

            (
                stream.index(),
                StreamTiming::of(&stream, input.duration()),
                stream.parameters(),
            )
        };

        let context = ffmpeg::codec::context::Context::from_parameters(parameters)?;
        let decoder = context.decoder().video()?;

        let scaled_width = (((decoder.width() as f64) * downscale).round() as u32).max(1);
        let scaled_height = (((decoder.height() as f64) * downscale).round() as u32).max(1);

        let scaler = ffmpeg::software::scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg::format::Pixel::RGBA,
            scaled_width,
            scaled_height,
            ffmpeg::software::scaling::Flags::AREA,
        )?;

        debug!(
            path,
            total_frames = timing.total_frames,
            frame_rate = timing.frame_rate,
            scaled_width,
            scaled_height,
            "Opened frame source"
        );

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base: timing.time_base,
            frame_rate: timing.frame_rate,
            total_frames: timing.total_frames,
            scaled_width,
            scaled_height,
            position: 0,
            pending: None,
            eof_sent: false,
        })
    }

    /// Build a factory that opens an independent source per worker
    pub fn factory(
        path: String,
        downscale: f64,
    ) -> impl SourceFactory<Source = FfmpegFrameSource> {
        move || FfmpegFrameSource::open(&path, downscale)
    }

    /// Feed one more packet into the decoder; false once fully drained
    fn pump(&mut self) -> CutScanResult<bool> {
        loop {
            match self.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() == self.stream_index {
                        self.decoder.send_packet(&packet)?;
                        return Ok(true);
                    }
                }
                None => {
                    if self.eof_sent {
                        return Ok(false);
                    }
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                    return Ok(true);
                }
            }
        }
    }

    /// Decode the next frame and derive its 1-based index from its pts
    fn decode_next(&mut self) -> CutScanResult<Option<(u64, ffmpeg::frame::Video)>> {
        let mut decoded = ffmpeg::frame::Video::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let index = match decoded.pts() {
                    Some(pts) => {
                        (pts as f64 * self.time_base * self.frame_rate).round() as u64 + 1
                    }
                    None => self.position + 1,
                };
                self.position = index;
                return Ok(Some((index, decoded)));
            }
            if !self.pump()? {
                return Ok(None);
            }
        }
    }

    /// Scale a decoded frame to RGBA at the configured dimensions
    fn convert(&mut self, frame: &ffmpeg::frame::Video) -> CutScanResult<RgbaImage> {
        let mut scaled = ffmpeg::frame::Video::empty();
        self.scaler.run(frame, &mut scaled)?;

        // The scaler's line stride can exceed width * 4; copy row by row
        let stride = scaled.stride(0);
        let row_len = (self.scaled_width * 4) as usize;
        let mut data = Vec::with_capacity(row_len * self.scaled_height as usize);
        for y in 0..self.scaled_height as usize {
            let offset = y * stride;
            data.extend_from_slice(&scaled.data(0)[offset..offset + row_len]);
        }

        RgbaImage::from_raw(self.scaled_width, self.scaled_height, data).ok_or_else(|| {
            CutScanError::FrameDecodeFailure {
                frame_index: self.position,
                message: "Scaled frame buffer size mismatch".to_string(),
            }
        })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.scaled_width, self.scaled_height)
    }

    fn seek(&mut self, frame_index: u64) -> CutScanResult<()> {
        let seconds = frame_index.saturating_sub(1) as f64 / self.frame_rate;
        let target = (seconds * f64::from(ffmpeg::ffi::AV_TIME_BASE)) as i64;

        self.input.seek(target, ..target)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.pending = None;
        self.position = 0;

        // The container seek lands on the keyframe at or before the target;
        // decode forward until the requested frame comes up
        while let Some((index, frame)) = self.decode_next()? {
            if index >= frame_index {
                let image = self.convert(&frame)?;
                self.pending = Some(image);
                break;
            }
        }
        Ok(())
    }

    fn read_next(&mut self) -> CutScanResult<Option<RgbaImage>> {
        if let Some(image) = self.pending.take() {
            return Ok(Some(image));
        }
        match self.decode_next()? {
            Some((_, frame)) => Ok(Some(self.convert(&frame)?)),
            None => Ok(None),
        }
    }
}
