#![deny(unreachable_patterns)]
//! Scene-change scoring of videos through the FFmpeg CLI.
//!
//! This crate provides:
//! - Video probing via `ffprobe` JSON output
//! - Sequential RGB frame decoding from an `ffmpeg` rawvideo pipe
//! - Consecutive-frame change scores on blurred luma frames
//! - Fixed-duration windowing of those scores into [`Segment`]s
//!
//! All operations are blocking; async callers should run [`analyze`] on a
//! blocking thread.
//!
//! [`Segment`]: reel_models::Segment

pub mod aggregator;
pub mod analyze;
pub mod differ;
pub mod error;
pub mod probe;
pub mod source;

pub use aggregator::{
    AggregationPolicy, WindowAggregator, DEFAULT_DIFF_THRESHOLD, DEFAULT_WINDOW_SEC,
    MIN_SEGMENT_DURATION_SEC,
};
pub use analyze::{analyze, analyze_source, AnalyzerConfig};
pub use differ::{mean_abs_diff, FrameDiffer, DEFAULT_BLUR_SIGMA};
pub use error::{MediaError, MediaResult};
pub use probe::{ffmpeg_available, probe_video, VideoInfo};
pub use source::{DecodeConfig, FfmpegFrameSource, FrameSource, VecFrameSource, DEFAULT_SCALE_WIDTH};
