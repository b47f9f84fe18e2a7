//! Axum HTTP API server for highlight reels.
//!
//! This crate provides:
//! - Video upload into a local upload directory
//! - Scene analysis, budgeted highlight selection and captioning
//! - Retrieval question answering with citations
//! - Security headers, request IDs and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
