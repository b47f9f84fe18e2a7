//! End-to-end scene-change analysis: frame source, differ and aggregator.

use std::path::Path;
use std::time::Instant;

use reel_models::Segment;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregator::{
    AggregationPolicy, WindowAggregator, DEFAULT_DIFF_THRESHOLD, DEFAULT_WINDOW_SEC,
};
use crate::differ::{FrameDiffer, DEFAULT_BLUR_SIGMA};
use crate::error::{MediaError, MediaResult};
use crate::source::{DecodeConfig, FfmpegFrameSource, FrameSource};

/// Parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Window length in seconds.
    pub window_sec: f64,
    /// Frame scores at or below this value do not count toward a window.
    pub diff_threshold: f64,
    /// Gaussian sigma applied to each luma frame before differencing.
    pub blur_sigma: f32,
    pub decode: DecodeConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_sec: DEFAULT_WINDOW_SEC,
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            decode: DecodeConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_window_sec(mut self, window_sec: f64) -> Self {
        self.window_sec = window_sec;
        self
    }

    pub fn with_diff_threshold(mut self, diff_threshold: f64) -> Self {
        self.diff_threshold = diff_threshold;
        self
    }

    /// Reject malformed arguments. Everything else about a run is non-fatal.
    pub fn validate(&self) -> MediaResult<()> {
        if !self.window_sec.is_finite() || self.window_sec <= 0.0 {
            return Err(MediaError::invalid_parameter(format!(
                "window_sec must be greater than zero, got {}",
                self.window_sec
            )));
        }
        if !self.diff_threshold.is_finite() || self.diff_threshold < 0.0 {
            return Err(MediaError::invalid_parameter(format!(
                "diff_threshold must be zero or positive, got {}",
                self.diff_threshold
            )));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(MediaError::invalid_parameter(format!(
                "blur_sigma must be zero or positive, got {}",
                self.blur_sigma
            )));
        }
        Ok(())
    }

    fn aggregator(&self) -> MediaResult<WindowAggregator> {
        WindowAggregator::new(
            self.window_sec,
            AggregationPolicy::SumAboveThreshold {
                threshold: self.diff_threshold,
            },
        )
    }
}

/// Analyze the video at `path` into scored, contiguous windows.
///
/// Blocking: decodes the whole video. Call from `spawn_blocking` in async code.
///
/// Returns `Err` only for malformed configuration. A video that cannot be
/// opened, or that reports no frames or no duration, yields `Ok(vec![])`.
pub fn analyze(path: impl AsRef<Path>, config: &AnalyzerConfig) -> MediaResult<Vec<Segment>> {
    config.validate()?;
    let path = path.as_ref();

    let source = match FfmpegFrameSource::open(path, &config.decode) {
        Ok(source) => source,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Video could not be opened, returning no segments"
            );
            return Ok(Vec::new());
        }
    };

    analyze_source(source, config)
}

/// Same as [`analyze`] over an already opened [`FrameSource`].
///
/// The source is closed on every exit path.
pub fn analyze_source<S: FrameSource>(
    mut source: S,
    config: &AnalyzerConfig,
) -> MediaResult<Vec<Segment>> {
    if let Err(e) = config.validate() {
        source.close();
        return Err(e);
    }
    let aggregator = match config.aggregator() {
        Ok(aggregator) => aggregator,
        Err(e) => {
            source.close();
            return Err(e);
        }
    };

    let fps = source.fps();
    let frame_count = source.frame_count();
    if !fps.is_finite() || fps <= 0.0 || frame_count == 0 {
        warn!(fps, frame_count, "Video has no usable frames, returning no segments");
        source.close();
        return Ok(Vec::new());
    }

    let started = Instant::now();
    let scores = FrameDiffer::new(source).with_blur_sigma(config.blur_sigma);
    let segments = aggregator.aggregate(scores, fps);

    info!(
        segments = segments.len(),
        frames = frame_count,
        fps,
        window_sec = config.window_sec,
        diff_threshold = config.diff_threshold,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Scene analysis complete"
    );

    Ok(segments)
}
