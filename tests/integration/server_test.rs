//! HTTP endpoint tests against the in-process router

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use chatstats::server::{router, ServerOptions};
use chatstats::AnalyzeOptions;

use crate::helpers::load_fixture;

const BOUNDARY: &str = "chatstats-test-boundary";

fn test_router(max_upload_bytes: u64) -> Router {
    router_with_timeout(max_upload_bytes, Duration::from_secs(10))
}

fn router_with_timeout(max_upload_bytes: u64, timeout: Duration) -> Router {
    router(ServerOptions {
        max_upload_bytes,
        timeout,
        max_concurrent: 2,
        analyze: AnalyzeOptions::default(),
    })
}

/// A transcript with `messages` alternating lines.
fn long_transcript(messages: usize) -> String {
    (0..messages)
        .map(|i| {
            let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
            format!(
                "[1/{}/24, 10:00:00 AM] {}: message number {} sorry 😀\n",
                i % 28 + 1,
                sender,
                i
            )
        })
        .collect()
}

/// Build a multipart body with a single part.
fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };
    let mut body = format!(
        "--{}\r\nContent-Disposition: {}\r\nContent-Type: text/plain\r\n\r\n",
        BOUNDARY, disposition
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ============================================================================
// POST /analyze
// ============================================================================

#[tokio::test]
async fn analyze_returns_report() {
    let body = multipart_body("file", Some("chat.txt"), load_fixture("two_person.txt").as_bytes());
    let (status, json) = send(test_router(1024 * 1024), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["person1"]["name"], "Alice");
    assert_eq!(json["person2"]["sorry_count"], 2);
    assert_eq!(json["monthly"]["2024"]["2"]["Bob"], 1);
}

#[tokio::test]
async fn analyze_tolerates_invalid_utf8() {
    let body = multipart_body(
        "file",
        Some("chat.txt"),
        b"[1/1/24, 10:00:00 AM] Alice: caf\xe9\n[1/1/24, 10:01:00 AM] Bob: ok",
    );
    let (status, json) = send(test_router(1024), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["person1"]["characters"], 3);
}

#[tokio::test]
async fn missing_file_field_is_bad_request() {
    let body = multipart_body("other", Some("chat.txt"), b"hello");
    let (status, json) = send(test_router(1024), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file provided");
}

#[tokio::test]
async fn empty_filename_is_bad_request() {
    let body = multipart_body("file", Some(""), b"hello");
    let (status, json) = send(test_router(1024), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Empty filename");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let content = load_fixture("two_person.txt");
    let body = multipart_body("file", Some("chat.txt"), content.as_bytes());
    let (status, json) = send(test_router(64), upload_request(body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "Upload exceeds the 64 B limit");
}

#[tokio::test]
async fn transcript_without_messages_is_unprocessable() {
    let body = multipart_body("file", Some("chat.txt"), load_fixture("system_only.txt").as_bytes());
    let (status, json) = send(test_router(1024), upload_request(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("No chat messages found in 2 line(s)"));
}

#[tokio::test]
async fn empty_upload_is_unprocessable() {
    let body = multipart_body("file", Some("chat.txt"), b"");
    let (status, json) = send(test_router(1024), upload_request(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Transcript is empty");
}

#[tokio::test]
async fn slow_analysis_times_out() {
    let content = long_transcript(5000);
    let body = multipart_body("file", Some("chat.txt"), content.as_bytes());
    let app = router_with_timeout(1024 * 1024, Duration::ZERO);
    let (status, json) = send(app, upload_request(body)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"], "Analysis timed out after 0 seconds");
}

// ============================================================================
// GET /health
// ============================================================================

#[tokio::test]
async fn health_reports_version() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(test_router(1024), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
