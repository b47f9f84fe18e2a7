//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "reel_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "reel_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "reel_http_requests_in_flight";

    // Pipeline metrics
    pub const ANALYSIS_DURATION_SECONDS: &str = "reel_analysis_duration_seconds";
    pub const SEGMENTS_ANALYZED: &str = "reel_segments_analyzed";
    pub const SEGMENTS_SELECTED: &str = "reel_segments_selected";
    pub const CAPTIONS_TOTAL: &str = "reel_captions_total";
    pub const UPLOADS_TOTAL: &str = "reel_uploads_total";
    pub const UPLOAD_BYTES: &str = "reel_upload_bytes";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one analysis run.
pub fn record_analysis(duration_secs: f64, segments: usize) {
    histogram!(names::ANALYSIS_DURATION_SECONDS).record(duration_secs);
    histogram!(names::SEGMENTS_ANALYZED).record(segments as f64);
}

/// Record the size of a selection.
pub fn record_selection(strategy: &str, selected: usize) {
    let labels = [("strategy", strategy.to_string())];
    histogram!(names::SEGMENTS_SELECTED, &labels).record(selected as f64);
}

/// Record a caption, labelled by provider and whether the template was used.
pub fn record_caption(provider: &str, fallback: bool) {
    let labels = [
        ("provider", provider.to_string()),
        ("fallback", fallback.to_string()),
    ];
    counter!(names::CAPTIONS_TOTAL, &labels).increment(1);
}

/// Record a stored upload.
pub fn record_upload(bytes: u64) {
    counter!(names::UPLOADS_TOTAL).increment(1);
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Metrics middleware for HTTP requests.
///
/// Requests are labelled by their route template so unmatched paths
/// cannot grow label cardinality.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
