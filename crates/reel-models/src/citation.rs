//! Retrieval (citation lookup) models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A source document backing an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Citation {
    /// Display title (file name of the source)
    pub title: String,
    /// Source path or URL
    pub source: String,
    /// Page number, 1-indexed
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Question for the retrieval endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AskRequest {
    pub query: String,
    /// Number of citations to return
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    3
}

impl AskRequest {
    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("query is required".to_string());
        }
        Ok(())
    }
}

/// Answer with supporting citations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AskResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
}
