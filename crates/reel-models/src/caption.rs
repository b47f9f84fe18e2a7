//! Caption generation request/response models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;
use crate::selection::SelectionStrategy;

/// Default highlight reel length in seconds.
pub const DEFAULT_TARGET_DURATION_SEC: f64 = 34.0;

/// Caption language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Traditional Chinese
    #[default]
    Zh,
    /// English
    En,
}

impl Language {
    /// Parse a language code leniently. Unknown codes fall back to the default.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Language::En,
            _ => Language::Zh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

/// Request to build a highlight reel and caption for an uploaded video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateCaptionRequest {
    /// Identifier returned by the upload endpoint
    pub video_id: String,

    /// Duration budget for the highlight reel (seconds)
    #[serde(default = "default_target_duration")]
    pub target_duration_sec: f64,

    /// Explicit filename in the upload directory (defaults to `video_id`)
    #[serde(default)]
    pub video_filename: Option<String>,

    /// Caption language code ("zh" or "en")
    #[serde(default)]
    pub language: Option<String>,

    /// Selection algorithm (defaults to optimal)
    #[serde(default)]
    pub strategy: Option<SelectionStrategy>,

    /// Override of the analysis window length (seconds)
    #[serde(default)]
    pub window_sec: Option<f64>,

    /// Override of the per-frame noise threshold
    #[serde(default)]
    pub diff_threshold: Option<f64>,
}

fn default_target_duration() -> f64 {
    DEFAULT_TARGET_DURATION_SEC
}

impl GenerateCaptionRequest {
    /// Create a request with defaults for everything but the video ID.
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            target_duration_sec: DEFAULT_TARGET_DURATION_SEC,
            video_filename: None,
            language: None,
            strategy: None,
            window_sec: None,
            diff_threshold: None,
        }
    }

    /// Filename to look up in the upload directory.
    pub fn filename(&self) -> &str {
        self.video_filename.as_deref().unwrap_or(&self.video_id)
    }

    /// Resolved caption language.
    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .map(Language::parse)
            .unwrap_or_default()
    }

    /// Resolved selection strategy.
    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy.unwrap_or_default()
    }

    /// Validate the request.
    ///
    /// A negative target is accepted: it selects nothing.
    pub fn validate(&self) -> Result<(), String> {
        if self.video_id.trim().is_empty() {
            return Err("video_id is required".to_string());
        }

        if !is_plain_filename(self.filename()) {
            return Err("video filename must not contain path components".to_string());
        }

        if !self.target_duration_sec.is_finite() {
            return Err("target_duration_sec must be a finite number".to_string());
        }

        if let Some(window) = self.window_sec {
            if !window.is_finite() || window <= 0.0 {
                return Err("window_sec must be greater than zero".to_string());
            }
        }

        if let Some(threshold) = self.diff_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err("diff_threshold must be zero or positive".to_string());
            }
        }

        Ok(())
    }
}

/// Whether `name` is a bare filename without traversal or separators.
pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Highlight reel plus generated caption.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateCaptionResponse {
    pub video_id: String,
    pub target_duration_sec: f64,
    /// Chosen segments in playback order
    pub highlight_segments: Vec<Segment>,
    pub total_duration: f64,
    pub total_score: f64,
    pub strategy: SelectionStrategy,
    pub caption: String,
    pub hashtags: Vec<String>,
}

/// Response from the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    pub video_id: String,
    pub path: String,
}
