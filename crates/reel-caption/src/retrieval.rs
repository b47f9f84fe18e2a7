//! Question answering with citations over an external document index.
//!
//! Building the index is out of scope; this module only queries a search
//! service that already holds one.

use async_trait::async_trait;
use reel_models::Citation;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RetrievalConfig;
use crate::error::{CaptionError, CaptionResult};

/// Answer returned when the index holds no documents.
pub const EMPTY_INDEX_ANSWER: &str = "（索引為空）目前沒有可檢索的資料。";

/// Answer template used until answers are generated from retrieved context.
pub const SUMMARY_ANSWER: &str = "需要辦理 e-Visa；細節依官方公告為準（此為 MVP 摘要示例）。";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Answer `query` using up to `k` documents, with one citation per document.
    async fn answer_with_citations(
        &self,
        query: &str,
        k: usize,
    ) -> CaptionResult<(String, Vec<Citation>)>;
}

/// Client for a vector search service exposing `POST /search`.
pub struct HttpRetriever {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    /// Path of the indexed document
    path: String,
    #[serde(default)]
    page: Option<u32>,
}

impl HttpRetriever {
    pub fn new(config: &RetrievalConfig) -> CaptionResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CaptionError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(&config.base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// File name component of a document path.
fn document_title(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}

impl From<SearchHit> for Citation {
    fn from(hit: SearchHit) -> Self {
        Citation {
            title: document_title(&hit.path),
            page: hit.page.unwrap_or(1),
            source: hit.path,
        }
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn answer_with_citations(
        &self,
        query: &str,
        k: usize,
    ) -> CaptionResult<(String, Vec<Citation>)> {
        let k = k.max(1);
        let url = format!("{}/search", self.base_url);
        debug!(k, "Querying retrieval service");

        let response = self
            .client
            .post(&url)
            .json(&SearchRequest { query, k })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::provider(status, body));
        }

        let body: SearchResponse = response.json().await?;
        if body.hits.is_empty() {
            info!("Retrieval index is empty");
            return Ok((EMPTY_INDEX_ANSWER.to_string(), Vec::new()));
        }

        let citations: Vec<Citation> = body.hits.into_iter().take(k).map(Citation::from).collect();
        info!(citations = citations.len(), "Retrieved documents");
        Ok((SUMMARY_ANSWER.to_string(), citations))
    }
}
