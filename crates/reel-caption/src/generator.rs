//! Text generation capability.
//!
//! The caption service depends on a [`TextGenerator`] handed to it at
//! construction. Providers are interchangeable behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CaptionResult;

/// Sampling parameters forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 60,
            temperature: 0.8,
            top_p: 0.9,
        }
    }
}

/// Anything that can turn a prompt into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`. The returned text has the prompt
    /// removed and surrounding whitespace trimmed.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> CaptionResult<String>;

    /// Short provider name for logs and metrics.
    fn name(&self) -> &'static str;
}
