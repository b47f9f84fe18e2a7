//! Consecutive-frame visual change scoring.
//!
//! # Algorithm
//! 1. Convert each frame to a single luma channel
//! 2. Gaussian-blur it to suppress sensor and compression noise
//! 3. Score = mean absolute per-pixel difference against the previous
//!    *smoothed* frame
//!
//! Differencing consecutive frames keeps the score sensitive to motion and
//! cuts while ignoring slow global brightness drift.

use image::{imageops, GrayImage, RgbImage};
use tracing::{debug, warn};

use crate::source::FrameSource;

/// Blur sigma matching a 5x5 Gaussian kernel.
pub const DEFAULT_BLUR_SIGMA: f32 = 1.1;

/// Lazy sequence of frame-transition scores.
///
/// Yields `frames - 1` values for a source of `frames` frames. Not
/// restartable: the source is closed as soon as the stream ends, a decode
/// error occurs, or the differ is dropped.
pub struct FrameDiffer<S: FrameSource> {
    source: Option<S>,
    previous: Option<GrayImage>,
    blur_sigma: f32,
    fps: f64,
}

impl<S: FrameSource> FrameDiffer<S> {
    /// Create a differ over `source` with the default blur.
    pub fn new(source: S) -> Self {
        let fps = source.fps();
        Self {
            source: Some(source),
            previous: None,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            fps,
        }
    }

    /// Override the blur sigma. Zero disables smoothing.
    pub fn with_blur_sigma(mut self, blur_sigma: f32) -> Self {
        self.blur_sigma = blur_sigma.max(0.0);
        self
    }

    /// Frame rate of the underlying source.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    fn smooth(&self, frame: &RgbImage) -> GrayImage {
        let gray = imageops::grayscale(frame);
        if self.blur_sigma > 0.0 {
            imageops::blur(&gray, self.blur_sigma)
        } else {
            gray
        }
    }

    fn finish(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        self.previous = None;
    }
}

impl<S: FrameSource> Iterator for FrameDiffer<S> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let source = self.source.as_mut()?;
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!("Frame stream finished");
                    self.finish();
                    return None;
                }
                Err(e) => {
                    warn!(error = %e, "Frame decoding failed, ending score stream");
                    self.finish();
                    return None;
                }
            };

            let smoothed = self.smooth(&frame);
            let previous = self.previous.replace(smoothed);
            if let (Some(prev), Some(curr)) = (previous.as_ref(), self.previous.as_ref()) {
                return Some(mean_abs_diff(prev, curr));
            }
        }
    }
}

impl<S: FrameSource> std::iter::FusedIterator for FrameDiffer<S> {}

impl<S: FrameSource> Drop for FrameDiffer<S> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Mean absolute per-pixel difference of two luma frames.
///
/// Frames of different sizes cannot be compared and score 0.0.
pub fn mean_abs_diff(a: &GrayImage, b: &GrayImage) -> f64 {
    if a.dimensions() != b.dimensions() {
        warn!(
            previous = ?a.dimensions(),
            current = ?b.dimensions(),
            "Frame size changed mid-stream"
        );
        return 0.0;
    }

    let pixels = a.as_raw().len();
    if pixels == 0 {
        return 0.0;
    }

    let total: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| x.abs_diff(y) as u64)
        .sum();

    total as f64 / pixels as f64
}
