//! Retrieval question answering.

use axum::extract::State;
use axum::Json;
use reel_models::{AskRequest, AskResponse};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    request.validate().map_err(ApiError::Validation)?;

    let (answer, citations) = state
        .retriever
        .answer_with_citations(&request.query, request.k)
        .await?;

    info!(k = request.k, citations = citations.len(), "Question answered");

    Ok(Json(AskResponse { answer, citations }))
}
