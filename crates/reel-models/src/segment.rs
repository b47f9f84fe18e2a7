//! Scored time windows of a video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scored, time-bounded window of video.
///
/// Produced by the window aggregator and consumed by the selectors. Segments
/// from one analysis run are contiguous, non-overlapping and ordered by
/// `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds from the beginning of the video
    pub start: f64,

    /// End time in seconds (`end > start`)
    pub end: f64,

    /// Visual activity accumulated over the window
    pub score: f64,
}

impl Segment {
    /// Create a new segment.
    pub fn new(start: f64, end: f64, score: f64) -> Self {
        Self { start, end, score }
    }

    /// Duration in seconds, never negative.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}
