//! Self-hosted text-generation server provider.
//!
//! Speaks the text-generation-inference `/generate` protocol. Some servers
//! echo the prompt in front of the completion; the echo is stripped.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CaptionError, CaptionResult};
use crate::generator::{GenerationParams, TextGenerator};

pub struct LocalProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

impl LocalProvider {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Remove a leading echo of `prompt` and trim.
fn strip_prompt<'a>(prompt: &str, output: &'a str) -> &'a str {
    output.strip_prefix(prompt).unwrap_or(output).trim()
}

#[async_trait]
impl TextGenerator for LocalProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> CaptionResult<String> {
        let url = format!("{}/generate", self.base_url);
        let request = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
                do_sample: true,
            },
        };

        debug!(url = %url, "Requesting local generation");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::provider(status, body));
        }

        let body: GenerateResponse = response.json().await?;
        let text = strip_prompt(prompt, &body.generated_text);
        if text.is_empty() {
            return Err(CaptionError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
