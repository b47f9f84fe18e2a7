//! Fixed-duration windowing of frame-transition scores.
//!
//! Consecutive scores are grouped into chunks of
//! `step_frames = max(1, round(window_sec * fps))`; the final chunk may be
//! shorter. Chunk `[a, b)` becomes `Segment { start: a / fps, end: b / fps }`
//! so consecutive segments share their boundary exactly. Segments shorter
//! than [`MIN_SEGMENT_DURATION_SEC`] (a truncated trailing window) are dropped.

use reel_models::Segment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SEC: f64 = 4.0;

/// Default per-transition noise threshold for [`AggregationPolicy::SumAboveThreshold`].
pub const DEFAULT_DIFF_THRESHOLD: f64 = 18.0;

/// Segments shorter than this are never emitted.
pub const MIN_SEGMENT_DURATION_SEC: f64 = 0.5;

/// How the scores inside one window are reduced to the window score.
///
/// The two policies rank windows differently; one aggregator applies exactly
/// one policy to every window of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Sum of the scores strictly above `threshold`. Rewards windows with many
    /// busy transitions. This is what `analyze` uses.
    SumAboveThreshold { threshold: f64 },
    /// Mean of all scores in the window. Rewards high average activity.
    Mean,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        AggregationPolicy::SumAboveThreshold {
            threshold: DEFAULT_DIFF_THRESHOLD,
        }
    }
}

/// Running state of one window.
#[derive(Debug, Default)]
struct WindowAccumulator {
    count: usize,
    sum: f64,
}

impl WindowAccumulator {
    fn push(&mut self, score: f64, policy: AggregationPolicy) {
        self.count += 1;
        match policy {
            AggregationPolicy::SumAboveThreshold { threshold } => {
                if score > threshold {
                    self.sum += score;
                }
            }
            AggregationPolicy::Mean => self.sum += score,
        }
    }

    fn score(&self, policy: AggregationPolicy) -> f64 {
        match policy {
            AggregationPolicy::SumAboveThreshold { .. } => self.sum,
            AggregationPolicy::Mean if self.count > 0 => self.sum / self.count as f64,
            AggregationPolicy::Mean => 0.0,
        }
    }
}

/// Groups frame scores into fixed-duration scored segments.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    window_sec: f64,
    policy: AggregationPolicy,
    min_duration_sec: f64,
}

impl Default for WindowAggregator {
    fn default() -> Self {
        Self {
            window_sec: DEFAULT_WINDOW_SEC,
            policy: AggregationPolicy::default(),
            min_duration_sec: MIN_SEGMENT_DURATION_SEC,
        }
    }
}

impl WindowAggregator {
    /// Create an aggregator. `window_sec` must be a positive finite number.
    pub fn new(window_sec: f64, policy: AggregationPolicy) -> MediaResult<Self> {
        if !window_sec.is_finite() || window_sec <= 0.0 {
            return Err(MediaError::invalid_parameter(format!(
                "window_sec must be greater than zero, got {}",
                window_sec
            )));
        }
        if let AggregationPolicy::SumAboveThreshold { threshold } = policy {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(MediaError::invalid_parameter(format!(
                    "diff threshold must be zero or positive, got {}",
                    threshold
                )));
            }
        }
        Ok(Self {
            window_sec,
            policy,
            min_duration_sec: MIN_SEGMENT_DURATION_SEC,
        })
    }

    pub fn window_sec(&self) -> f64 {
        self.window_sec
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Number of frame scores per window at `fps`.
    pub fn step_frames(&self, fps: f64) -> usize {
        ((self.window_sec * fps).round() as usize).max(1)
    }

    /// Consume `scores` (one per frame transition) and emit segments in order.
    ///
    /// Scores are folded as they arrive; the sequence is never buffered.
    pub fn aggregate<I>(&self, scores: I, fps: f64) -> Vec<Segment>
    where
        I: IntoIterator<Item = f64>,
    {
        if !fps.is_finite() || fps <= 0.0 {
            warn!(fps, "Invalid frame rate, no segments produced");
            return Vec::new();
        }

        let step = self.step_frames(fps);
        let mut segments = Vec::new();
        let mut window_start = 0usize;
        let mut window = WindowAccumulator::default();

        for score in scores {
            window.push(score, self.policy);
            if window.count == step {
                self.emit(&mut segments, window_start, &window, fps);
                window_start += step;
                window = WindowAccumulator::default();
            }
        }

        if window.count > 0 {
            self.emit(&mut segments, window_start, &window, fps);
        }

        debug!(
            segments = segments.len(),
            step_frames = step,
            window_sec = self.window_sec,
            "Aggregated frame scores into windows"
        );
        segments
    }

    fn emit(&self, segments: &mut Vec<Segment>, first: usize, window: &WindowAccumulator, fps: f64) {
        let start = first as f64 / fps;
        let end = (first + window.count) as f64 / fps;
        if end - start < self.min_duration_sec {
            debug!(start, end, "Dropping window shorter than minimum duration");
            return;
        }
        segments.push(Segment::new(start, end, window.score(self.policy)));
    }
}
