//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use reel_media::{AnalyzerConfig, DecodeConfig, DEFAULT_DIFF_THRESHOLD, DEFAULT_SCALE_WIDTH, DEFAULT_WINDOW_SEC};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Directory holding uploaded videos
    pub upload_dir: PathBuf,
    /// Serve Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Analysis defaults, overridable per request
    pub analysis: AnalyzerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(300),
            max_body_size: 512 * 1024 * 1024, // 512MB
            environment: "development".to_string(),
            upload_dir: PathBuf::from("data/videos"),
            metrics_enabled: true,
            analysis: AnalyzerConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let scale_width = match std::env::var("ANALYSIS_SCALE_WIDTH") {
            Ok(s) => match s.trim().parse::<u32>() {
                Ok(0) => None,
                Ok(width) => Some(width),
                Err(_) => Some(DEFAULT_SCALE_WIDTH),
            },
            Err(_) => Some(DEFAULT_SCALE_WIDTH),
        };

        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(512 * 1024 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/videos")),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            analysis: AnalyzerConfig {
                window_sec: std::env::var("ANALYSIS_WINDOW_SEC")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_WINDOW_SEC),
                diff_threshold: std::env::var("ANALYSIS_DIFF_THRESHOLD")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DIFF_THRESHOLD),
                decode: DecodeConfig { scale_width },
                ..AnalyzerConfig::default()
            },
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Analysis settings for one request, applying its overrides.
    pub fn analyzer_for(&self, window_sec: Option<f64>, diff_threshold: Option<f64>) -> AnalyzerConfig {
        let mut config = self.analysis.clone();
        if let Some(window_sec) = window_sec {
            config.window_sec = window_sec;
        }
        if let Some(diff_threshold) = diff_threshold {
            config.diff_threshold = diff_threshold;
        }
        config
    }
}
