//! Shared data models for the highlight reel backend.
//!
//! This crate provides Serde-serializable types for:
//! - Scored video segments and selection results
//! - Selection strategies
//! - HTTP request/response envelopes for captioning and retrieval

pub mod caption;
pub mod citation;
pub mod segment;
pub mod selection;

// Re-export common types
pub use caption::{
    is_plain_filename, GenerateCaptionRequest, GenerateCaptionResponse, Language, UploadResponse,
    DEFAULT_TARGET_DURATION_SEC,
};
pub use citation::{AskRequest, AskResponse, Citation};
pub use segment::Segment;
pub use selection::{Selection, SelectionStrategy};
