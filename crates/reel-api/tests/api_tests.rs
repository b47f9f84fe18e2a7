//! Router tests against in-process stub providers.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use reel_api::{create_router, ApiConfig, AppState};
use reel_caption::{CaptionError, CaptionResult, GenerationParams, Retriever, TextGenerator};
use reel_models::Citation;
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubGenerator {
    reply: Option<&'static str>,
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> CaptionResult<String> {
        match self.reply {
            Some(text) => Ok(text.to_string()),
            None => Err(CaptionError::provider(503, "unavailable")),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct StubRetriever {
    fail: bool,
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn answer_with_citations(
        &self,
        _query: &str,
        k: usize,
    ) -> CaptionResult<(String, Vec<Citation>)> {
        if self.fail {
            return Err(CaptionError::provider(500, "index offline"));
        }
        let citations = (0..k.max(1))
            .map(|i| Citation {
                title: format!("doc{}.md", i),
                source: format!("docs/doc{}.md", i),
                page: 1,
            })
            .collect();
        Ok(("stub answer".to_string(), citations))
    }
}

fn test_router(upload_dir: &Path, reply: Option<&'static str>, retrieval_fails: bool) -> Router {
    let config = ApiConfig {
        upload_dir: upload_dir.to_path_buf(),
        ..ApiConfig::default()
    };
    let state = AppState::new(
        config,
        Arc::new(StubGenerator { reply }),
        Arc::new(StubRetriever {
            fail: retrieval_fails,
        }),
    );
    create_router(state, None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let boundary = "reel-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: video/mp4\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload_video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "highlight-reel");
}

#[tokio::test]
async fn test_health_endpoint_sets_headers() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["X-Request-ID"], "req-123");
    assert_eq!(response.headers()["X-Content-Type-Options"], "nosniff");
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_caption_missing_video() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(post_json(
            "/generate_caption",
            json!({"video_id": "missing.mp4"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "video_not_found");
    assert!(body["detail"].as_str().unwrap().contains("missing.mp4"));
    assert!(body["hint"].as_str().unwrap().contains("/upload_video"));
}

#[tokio::test]
async fn test_generate_caption_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(post_json(
            "/generate_caption",
            json!({"video_id": "x", "video_filename": "../secret.mp4"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_generate_caption_rejects_bad_window() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clip.mp4"), b"data").unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(post_json(
            "/generate_caption",
            json!({"video_id": "clip.mp4", "window_sec": -4.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_caption_unreadable_video_is_empty_reel() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.mp4"), b"not really a video").unwrap();
    let app = test_router(dir.path(), Some("Harbor lights #Travel #Night"), false);

    let response = app
        .oneshot(post_json(
            "/generate_caption",
            json!({"video_id": "broken.mp4", "language": "en", "strategy": "greedy"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["video_id"], "broken.mp4");
    assert_eq!(body["target_duration_sec"], 34.0);
    assert_eq!(body["highlight_segments"], json!([]));
    assert_eq!(body["total_duration"], 0.0);
    assert_eq!(body["strategy"], "greedy");
    assert_eq!(body["caption"], "Harbor lights #Travel #Night");
    assert_eq!(body["hashtags"], json!(["#Travel", "#Night"]));
}

#[tokio::test]
async fn test_generate_caption_provider_failure_uses_template() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.mp4"), b"not really a video").unwrap();
    let app = test_router(dir.path(), None, false);

    let response = app
        .oneshot(post_json(
            "/generate_caption",
            json!({"video_id": "broken.mp4", "language": "en"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["strategy"], "optimal");
    assert_eq!(body["caption"], "Auto-selected 0 segments (~0 s)");
    assert_eq!(
        body["hashtags"],
        json!(["#AutoHighlight", "#Travel", "#Shorts"])
    );
}

#[tokio::test]
async fn test_upload_video_stores_file() {
    let dir = tempfile::tempdir().unwrap();
    let upload_dir = dir.path().join("videos");
    let app = test_router(&upload_dir, Some("caption"), false);

    let response = app
        .oneshot(multipart_request("file", "beach day.mp4", b"fake video bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["video_id"], "beach day.mp4");

    let stored = upload_dir.join("beach day.mp4");
    assert_eq!(body["path"], &*stored.to_string_lossy());
    assert_eq!(std::fs::read(&stored).unwrap(), b"fake video bytes");
}

#[tokio::test]
async fn test_upload_video_strips_directories() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(multipart_request("file", "../../escape.mp4", b"bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["video_id"], "escape.mp4");
    assert!(dir.path().join("escape.mp4").exists());
}

#[tokio::test]
async fn test_upload_video_requires_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(multipart_request("attachment", "clip.mp4", b"bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_returns_citations() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(post_json("/ask", json!({"query": "Do I need a visa?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], "stub answer");
    assert_eq!(body["citations"].as_array().unwrap().len(), 3);
    assert_eq!(body["citations"][0]["page"], 1);
}

#[tokio::test]
async fn test_ask_rejects_empty_query() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(post_json("/ask", json!({"query": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_upstream_failure() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), true);

    let response = app
        .oneshot(post_json("/ask", json!({"query": "visa", "k": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "upstream_error");
}

#[tokio::test]
async fn test_retrieve_info_alias() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(post_json(
            "/retrieve_info",
            json!({"query": "台灣人去斯里蘭卡要簽證嗎？"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.get("answer").is_some());
    assert!(body["citations"].is_array());
}

#[tokio::test]
async fn test_upload_truncated_body_removes_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let boundary = "reel-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\npartial bytes with no closing boundary",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload_video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!dir.path().join("cut.mp4").exists());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_upload_write_failure_removes_partial_file() {
    let full = Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    // Every write through this name fails with ENOSPC.
    let target = dir.path().join("full.mp4");
    std::os::unix::fs::symlink(full, &target).unwrap();
    let app = test_router(dir.path(), Some("caption"), false);

    let response = app
        .oneshot(multipart_request("file", "full.mp4", &[7u8; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(std::fs::symlink_metadata(&target).is_err());
}
