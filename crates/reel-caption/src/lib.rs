//! Caption generation and document retrieval clients.
//!
//! Providers are HTTP clients behind the [`TextGenerator`] and [`Retriever`]
//! traits, built from environment configuration and injected into the
//! services that use them.

pub mod config;
pub mod error;
pub mod generator;
pub mod hashtags;
pub mod local;
pub mod openai;
pub mod prompt;
pub mod retrieval;
pub mod service;

use std::sync::Arc;

use reqwest::Client;
use tracing::info;

pub use config::{CaptionConfig, OpenAiConfig, ProviderKind, RetrievalConfig};
pub use error::{CaptionError, CaptionResult};
pub use generator::{GenerationParams, TextGenerator};
pub use hashtags::{default_hashtags, extract_hashtags, DEFAULT_HASHTAGS};
pub use local::LocalProvider;
pub use openai::OpenAiProvider;
pub use prompt::{build_prompt, format_moments};
pub use retrieval::{HttpRetriever, Retriever};
pub use service::{fallback_caption, CaptionOutcome, CaptionService};

/// Build the configured caption provider.
pub fn build_generator(config: &CaptionConfig) -> CaptionResult<Arc<dyn TextGenerator>> {
    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| CaptionError::config(format!("failed to build HTTP client: {}", e)))?;

    let generator: Arc<dyn TextGenerator> = match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(&config.openai, client)?),
        ProviderKind::Local => Arc::new(LocalProvider::new(&config.local_url, client)),
    };

    info!(provider = generator.name(), "Caption provider ready");
    Ok(generator)
}
