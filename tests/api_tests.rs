use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use pcguide::aggregator::Aggregator;
use pcguide::api::create_router;
use pcguide::api::models::ApiError;

mod common;
use common::{Behavior, forum_source, video_source};

fn router(videos: Behavior, forums: Behavior) -> Router {
    let aggregator = Aggregator::new(video_source(videos), forum_source(forums));
    create_router(Arc::new(aggregator), "does-not-exist")
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .method(Method::GET)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn search_returns_envelope() {
    let (status, body) = get_json(
        router(Behavior::Items(2), Behavior::Items(3)),
        "/api/search?componentType=GPU&brand=NVIDIA&model=RTX%204070",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"].as_array().unwrap().len(), 2);
    assert_eq!(body["manuals"].as_array().unwrap().len(), 3);
    assert_eq!(body["query"], "NVIDIA RTX 4070 GPU installation guide manual");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());

    let video = &body["videos"][0];
    assert_eq!(video["type"], "video");
    assert_eq!(video["source"], "YouTube");
    assert_eq!(video["channelTitle"], "Builds");
    assert_eq!(video["viewCount"], "1,000");
    assert!(video["thumbnail"].is_null());

    let manual = &body["manuals"][0];
    assert_eq!(manual["type"], "forum");
    assert_eq!(manual["subreddit"], "buildapc");
    assert!(manual["comments"].is_i64());
}

#[tokio::test]
async fn missing_brand_is_bad_request() {
    let (status, body) = get_json(
        router(Behavior::Items(2), Behavior::Items(3)),
        "/api/search?componentType=GPU",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Component type and brand are required");
}

#[tokio::test]
async fn failing_sources_still_succeed() {
    let (status, body) = get_json(
        router(Behavior::Fail, Behavior::Panic),
        "/api/search?componentType=CPU&brand=AMD",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"], Value::Array(vec![]));
    assert_eq!(body["manuals"], Value::Array(vec![]));
    assert_eq!(body["query"], "AMD CPU installation guide manual");
}

#[tokio::test]
async fn preflight_gets_cors_headers() {
    let response = router(Behavior::Items(0), Behavior::Items(0))
        .oneshot(
            Request::builder()
                .uri("/api/search")
                .method(Method::OPTIONS)
                .header(header::ORIGIN, "http://localhost:8888")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn static_files_are_served() {
    let dir: PathBuf = std::env::temp_dir().join(format!("pcguide-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>PC Guide</h1>").unwrap();

    let aggregator = Aggregator::new(
        video_source(Behavior::Items(0)),
        forum_source(Behavior::Items(0)),
    );
    let response = create_router(Arc::new(aggregator), &dir)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>PC Guide</h1>");

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn internal_errors_hide_details() {
    let response = ApiError::Internal.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Failed to search for manuals");
}
