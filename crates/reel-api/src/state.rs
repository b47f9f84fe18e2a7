//! Application state.

use std::sync::Arc;

use reel_caption::{
    build_generator, CaptionConfig, CaptionService, GenerationParams, HttpRetriever,
    RetrievalConfig, Retriever, TextGenerator,
};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Holds configuration and injected capabilities only. Analysis and
/// selection state is built per request.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub captions: CaptionService,
    pub generation: GenerationParams,
    pub retriever: Arc<dyn Retriever>,
}

impl AppState {
    /// Assemble state from already built capabilities.
    pub fn new(
        config: ApiConfig,
        generator: Arc<dyn TextGenerator>,
        retriever: Arc<dyn Retriever>,
    ) -> Self {
        Self {
            config,
            captions: CaptionService::new(generator),
            generation: GenerationParams::default(),
            retriever,
        }
    }

    /// Override the sampling parameters used for captions.
    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    /// Create application state from environment configuration.
    pub fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let caption_config = CaptionConfig::from_env();
        let generator = build_generator(&caption_config)?;
        let retriever: Arc<dyn Retriever> =
            Arc::new(HttpRetriever::new(&RetrievalConfig::from_env())?);

        Ok(Self::new(config, generator, retriever).with_generation(caption_config.params))
    }
}
