//! Error types for caption and retrieval clients.

use thiserror::Error;

/// Result type for caption operations.
pub type CaptionResult<T> = Result<T, CaptionError>;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaptionError {
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a retry could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CaptionError::Request(e) => e.is_timeout() || e.is_connect(),
            CaptionError::Provider { status, .. } => *status == 429 || *status >= 500,
            CaptionError::EmptyResponse | CaptionError::Config(_) => false,
        }
    }
}
