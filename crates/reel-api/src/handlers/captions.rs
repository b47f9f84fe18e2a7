//! Highlight selection and caption generation.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use reel_models::{GenerateCaptionRequest, GenerateCaptionResponse};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Analyze an uploaded video, pick highlights within the target duration
/// and caption them.
///
/// An unreadable video is not an error: it yields an empty highlight list
/// and a template caption.
pub async fn generate_caption(
    State(state): State<AppState>,
    Json(request): Json<GenerateCaptionRequest>,
) -> ApiResult<Json<GenerateCaptionResponse>> {
    request.validate().map_err(ApiError::Validation)?;

    let video_path = state.config.upload_dir.join(request.filename());
    let exists = tokio::fs::try_exists(&video_path).await.unwrap_or(false);
    if !exists {
        return Err(ApiError::VideoNotFound(
            video_path.to_string_lossy().into_owned(),
        ));
    }

    let analyzer = state
        .config
        .analyzer_for(request.window_sec, request.diff_threshold);
    let started = Instant::now();
    let segments = tokio::task::spawn_blocking(move || reel_media::analyze(&video_path, &analyzer))
        .await
        .map_err(|e| ApiError::internal(format!("Analysis task failed: {}", e)))??;
    let analysis_secs = started.elapsed().as_secs_f64();
    metrics::record_analysis(analysis_secs, segments.len());

    if segments.is_empty() {
        warn!(video_id = %request.video_id, "No segments produced for video");
    }

    let strategy = request.strategy();
    let selection = reel_planner::select(strategy, &segments, request.target_duration_sec);
    metrics::record_selection(strategy.as_str(), selection.len());

    let outcome = state
        .captions
        .caption(
            &request.video_id,
            &selection.chosen,
            request.language(),
            &state.generation,
        )
        .await;
    metrics::record_caption(state.captions.provider_name(), outcome.fallback);

    info!(
        video_id = %request.video_id,
        strategy = %strategy,
        analyzed = segments.len(),
        selected = selection.len(),
        total_duration = selection.total_duration,
        total_score = selection.total_score,
        analysis_ms = (analysis_secs * 1000.0) as u64,
        "Highlight reel generated"
    );

    Ok(Json(GenerateCaptionResponse {
        video_id: request.video_id,
        target_duration_sec: request.target_duration_sec,
        highlight_segments: selection.chosen,
        total_duration: selection.total_duration,
        total_score: selection.total_score,
        strategy,
        caption: outcome.caption,
        hashtags: outcome.hashtags,
    }))
}
