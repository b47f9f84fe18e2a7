//! Sequential video frame sources.
//!
//! A [`FrameSource`] hands out decoded frames in playback order and owns
//! whatever handle backs them. Opening is done by each implementation's
//! constructor; [`FrameSource::close`] releases the handle and must be safe
//! to call more than once.

use std::collections::VecDeque;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, VideoInfo};

/// Default analysis width. Frames are downscaled before differencing.
pub const DEFAULT_SCALE_WIDTH: u32 = 320;

/// A readable video exposing frames in playback order. No seeking.
pub trait FrameSource {
    /// Frames per second.
    fn fps(&self) -> f64;

    /// Total number of frames, as reported by the container.
    fn frame_count(&self) -> u64;

    /// Duration in seconds.
    fn duration(&self) -> f64 {
        let fps = self.fps();
        if fps > 0.0 {
            self.frame_count() as f64 / fps
        } else {
            0.0
        }
    }

    /// Next decoded frame, or `None` at end of stream.
    fn next_frame(&mut self) -> MediaResult<Option<RgbImage>>;

    /// Release the underlying handle.
    fn close(&mut self);
}

/// Decoder settings for [`FfmpegFrameSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Downscale frames to this width (aspect preserved). `None` keeps the
    /// native resolution.
    pub scale_width: Option<u32>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            scale_width: Some(DEFAULT_SCALE_WIDTH),
        }
    }
}

impl DecodeConfig {
    /// Output dimensions for a video of `width`x`height`.
    ///
    /// Never upscales. Scaled dimensions are rounded to even numbers for the
    /// FFmpeg scaler.
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        match self.scale_width {
            Some(target) if target > 0 && target < width => {
                let target = (target & !1).max(2);
                let scaled = (height as f64 * target as f64 / width as f64).round() as u32;
                (target, (scaled & !1).max(2))
            }
            _ => (width, height),
        }
    }
}

/// Frame source backed by an `ffmpeg` child process writing raw RGB24
/// frames to a pipe.
pub struct FfmpegFrameSource {
    info: VideoInfo,
    width: u32,
    height: u32,
    child: Option<Child>,
    reader: Option<BufReader<ChildStdout>>,
}

impl FfmpegFrameSource {
    /// Probe and open a video file for sequential decoding.
    ///
    /// Fails if FFmpeg is missing, the file cannot be inspected, or the video
    /// reports zero frames or zero duration.
    pub fn open(path: impl AsRef<Path>, config: &DecodeConfig) -> MediaResult<Self> {
        let path = path.as_ref();

        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let info = probe_video(path)?;
        if info.frame_count == 0 || info.duration <= 0.0 {
            return Err(MediaError::invalid_video("Video reports zero duration"));
        }
        if info.width == 0 || info.height == 0 {
            return Err(MediaError::invalid_video("Video reports zero dimensions"));
        }

        let (width, height) = config.output_size(info.width, info.height);

        let mut child = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-i"])
            .arg(path)
            .args([
                "-an",
                "-sn",
                "-vf",
                &format!("scale={}:{}", width, height),
                "-pix_fmt",
                "rgb24",
                "-f",
                "rawvideo",
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::ffmpeg_failed(format!("Failed to spawn FFmpeg: {}", e)))?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(MediaError::ffmpeg_failed("Failed to capture FFmpeg stdout"));
            }
        };

        info!(
            path = %path.display(),
            fps = info.fps,
            frames = info.frame_count,
            duration = info.duration,
            width,
            height,
            "Opened video for frame decoding"
        );

        Ok(Self {
            info,
            width,
            height,
            child: Some(child),
            reader: Some(BufReader::new(stdout)),
        })
    }

    /// Probed video information.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Dimensions of decoded frames.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSource for FfmpegFrameSource {
    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn duration(&self) -> f64 {
        self.info.duration
    }

    fn next_frame(&mut self) -> MediaResult<Option<RgbImage>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        match reader.read_exact(&mut buffer) {
            Ok(()) => RgbImage::from_raw(self.width, self.height, buffer)
                .map(Some)
                .ok_or_else(|| MediaError::ffmpeg_failed("Decoded frame has unexpected size")),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.close();
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn close(&mut self) {
        self.reader = None;
        if let Some(mut child) = self.child.take() {
            // Exits on its own at end of stream; kill covers early termination.
            let _ = child.kill();
            let _ = child.wait();
            debug!("FFmpeg decoder closed");
        }
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// In-memory frame source over already decoded frames.
pub struct VecFrameSource {
    fps: f64,
    frame_count: u64,
    frames: VecDeque<RgbImage>,
    closed: bool,
}

impl VecFrameSource {
    pub fn new(frames: Vec<RgbImage>, fps: f64) -> Self {
        Self {
            fps,
            frame_count: frames.len() as u64,
            frames: frames.into(),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl FrameSource for VecFrameSource {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn next_frame(&mut self) -> MediaResult<Option<RgbImage>> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.frames.pop_front())
    }

    fn close(&mut self) {
        self.closed = true;
        self.frames.clear();
    }
}
