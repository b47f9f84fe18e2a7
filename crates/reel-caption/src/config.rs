//! Caption and retrieval configuration.

use std::time::Duration;

use crate::generator::GenerationParams;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LOCAL_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_RETRIEVAL_URL: &str = "http://127.0.0.1:8090";

/// Which caption provider to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Self-hosted text-generation server.
    #[default]
    Local,
    OpenAi,
}

impl ProviderKind {
    /// Parse a provider name. Unknown names select the local provider.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "openai" => ProviderKind::OpenAi,
            _ => ProviderKind::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::OpenAi => "openai",
        }
    }
}

/// OpenAI-compatible chat completions settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

/// Caption provider configuration.
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    pub provider: ProviderKind,
    pub openai: OpenAiConfig,
    /// Base URL of the local text-generation server
    pub local_url: String,
    /// Per-request timeout for provider calls
    pub timeout: Duration,
    pub params: GenerationParams,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            openai: OpenAiConfig::default(),
            local_url: DEFAULT_LOCAL_URL.to_string(),
            timeout: Duration::from_secs(60),
            params: GenerationParams::default(),
        }
    }
}

impl CaptionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = GenerationParams::default();
        Self {
            provider: std::env::var("CAPTION_PROVIDER")
                .map(|s| ProviderKind::parse(&s))
                .unwrap_or_default(),
            openai: OpenAiConfig {
                api_key: std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                base_url: std::env::var("OPENAI_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                model: std::env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            },
            local_url: std::env::var("CAPTION_LOCAL_URL")
                .unwrap_or_else(|_| DEFAULT_LOCAL_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("CAPTION_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            params: GenerationParams {
                max_new_tokens: std::env::var("CAPTION_MAX_NEW_TOKENS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_new_tokens),
                temperature: std::env::var("CAPTION_TEMPERATURE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.temperature),
                top_p: std::env::var("CAPTION_TOP_P")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.top_p),
            },
        }
    }
}

/// Retrieval service configuration.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RETRIEVAL_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetrievalConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("RETRIEVAL_URL")
                .unwrap_or_else(|_| DEFAULT_RETRIEVAL_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("RETRIEVAL_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
