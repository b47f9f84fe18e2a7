//! Caption service: prompt, provider call, hashtag extraction, fallback.

use std::sync::Arc;
use std::time::Instant;

use reel_models::{Language, Segment};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generator::{GenerationParams, TextGenerator};
use crate::hashtags::{default_hashtags, extract_hashtags};
use crate::prompt::build_prompt;

/// Caption text plus the hashtags attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionOutcome {
    pub caption: String,
    pub hashtags: Vec<String>,
    /// True when the provider failed and the template caption was used.
    pub fallback: bool,
}

/// Template caption used when no provider output is available.
pub fn fallback_caption(segments: &[Segment], language: Language) -> String {
    let total: f64 = segments.iter().map(Segment::duration).sum();
    let seconds = total.trunc() as i64;
    match language {
        Language::Zh => format!("自動挑選 {} 段（約 {} 秒）", segments.len(), seconds),
        Language::En => format!("Auto-selected {} segments (~{} s)", segments.len(), seconds),
    }
}

/// Generates captions through an injected [`TextGenerator`].
#[derive(Clone)]
pub struct CaptionService {
    generator: Arc<dyn TextGenerator>,
}

impl CaptionService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn provider_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Caption the chosen segments of a video.
    ///
    /// Never fails: a provider error is logged and replaced by the template
    /// caption with the default hashtags.
    pub async fn caption(
        &self,
        video_id: &str,
        segments: &[Segment],
        language: Language,
        params: &GenerationParams,
    ) -> CaptionOutcome {
        let prompt = build_prompt(video_id, segments, language);
        let started = Instant::now();

        match self.generator.generate(&prompt, params).await {
            Ok(text) => {
                let hashtags = match extract_hashtags(&text) {
                    tags if tags.is_empty() => default_hashtags(),
                    tags => tags,
                };
                info!(
                    video_id = %video_id,
                    provider = self.generator.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Caption generated"
                );
                CaptionOutcome {
                    caption: text,
                    hashtags,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(
                    video_id = %video_id,
                    provider = self.generator.name(),
                    error = %e,
                    "Caption provider failed, using template caption"
                );
                CaptionOutcome {
                    caption: fallback_caption(segments, language),
                    hashtags: default_hashtags(),
                    fallback: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptionError;
    use crate::generator::MockTextGenerator;
    use mockall::predicate::*;

    fn segments() -> Vec<Segment> {
        vec![Segment::new(0.0, 4.0, 10.0), Segment::new(8.0, 12.5, 9.0)]
    }

    #[tokio::test]
    async fn test_caption_uses_provider_hashtags() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .with(
                function(|prompt: &str| prompt.contains("Key moments: 0-4s / 8-12s.")),
                eq(GenerationParams::default()),
            )
            .times(1)
            .returning(|_, _| Ok("Street food crawl at dusk #Foodie #Travel".to_string()));
        generator.expect_name().return_const("mock");

        let service = CaptionService::new(Arc::new(generator));
        let outcome = service
            .caption("trip.mp4", &segments(), Language::En, &GenerationParams::default())
            .await;

        assert!(!outcome.fallback);
        assert_eq!(outcome.caption, "Street food crawl at dusk #Foodie #Travel");
        assert_eq!(outcome.hashtags, vec!["#Foodie", "#Travel"]);
    }

    #[tokio::test]
    async fn test_caption_without_hashtags_gets_defaults() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Ok("A quiet morning by the river".to_string()));
        generator.expect_name().return_const("mock");

        let service = CaptionService::new(Arc::new(generator));
        let outcome = service
            .caption("trip.mp4", &segments(), Language::En, &GenerationParams::default())
            .await;

        assert!(!outcome.fallback);
        assert_eq!(outcome.hashtags, default_hashtags());
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(CaptionError::provider(500, "boom")));
        generator.expect_name().return_const("mock");

        let service = CaptionService::new(Arc::new(generator));
        let outcome = service
            .caption("trip.mp4", &segments(), Language::En, &GenerationParams::default())
            .await;

        assert!(outcome.fallback);
        assert_eq!(outcome.caption, "Auto-selected 2 segments (~8 s)");
        assert_eq!(outcome.hashtags, vec!["#AutoHighlight", "#Travel", "#Shorts"]);
    }

    #[test]
    fn test_fallback_caption_zh() {
        assert_eq!(fallback_caption(&[], Language::Zh), "自動挑選 0 段（約 0 秒）");
    }
}
