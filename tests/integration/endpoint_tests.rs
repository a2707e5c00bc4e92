//! Integration tests for the liveness, health, and static endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::test_utils::{
    test_router, test_router_with_missing, MockObjectStore, TEST_BUCKET, TEST_REGION,
};

// =============================================================================
// /test
// =============================================================================

#[tokio::test]
async fn test_liveness_endpoint() {
    let router = test_router(MockObjectStore::new());

    let request = Request::builder()
        .uri("/test")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["message"], "Server is running!");
    assert_eq!(json["bucket"], TEST_BUCKET);
    assert_eq!(json["region"], TEST_REGION);

    // Timestamp must parse as ISO-8601
    let ts = json["timestamp"].as_str().unwrap();
    assert!(
        chrono::DateTime::parse_from_rfc3339(ts).is_ok(),
        "timestamp should be ISO-8601, got {ts}"
    );
}

#[tokio::test]
async fn test_liveness_works_with_missing_config() {
    // /test never depends on configuration state
    let router = test_router_with_missing(
        MockObjectStore::new(),
        vec!["KLYM_AWS_ACCESS_KEY", "KLYM_AWS_SECRET_KEY", "KLYM_S3_BUCKET"],
    );

    let request = Request::builder()
        .uri("/test")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// /health
// =============================================================================

#[tokio::test]
async fn test_health_ok_when_fully_configured() {
    let router = test_router(MockObjectStore::new());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["message"], "All environment variables configured");
    assert_eq!(json["bucket"], TEST_BUCKET);
    assert_eq!(json["region"], TEST_REGION);
}

#[tokio::test]
async fn test_health_reports_all_missing_variables() {
    let router = test_router_with_missing(
        MockObjectStore::new(),
        vec!["KLYM_AWS_ACCESS_KEY", "KLYM_AWS_SECRET_KEY", "KLYM_S3_BUCKET"],
    );

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "error");
    assert_eq!(
        json["missing"],
        serde_json::json!(["KLYM_AWS_ACCESS_KEY", "KLYM_AWS_SECRET_KEY", "KLYM_S3_BUCKET"])
    );
}

#[tokio::test]
async fn test_health_reports_single_missing_variable() {
    let router =
        test_router_with_missing(MockObjectStore::new(), vec!["KLYM_S3_BUCKET"]);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["missing"], serde_json::json!(["KLYM_S3_BUCKET"]));
}

// =============================================================================
// Static Fallback
// =============================================================================

#[tokio::test]
async fn test_unknown_path_is_404() {
    let router = test_router(MockObjectStore::new());

    let request = Request::builder()
        .uri("/no-such-asset.html")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_fallback_serves_existing_file() {
    use upload_relay::server::{create_router, RouterConfig};

    // Point the fallback at a real directory with a known file
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>upload</html>").unwrap();

    let state = super::test_utils::test_state(MockObjectStore::new(), vec![]);
    let router = create_router(
        state,
        RouterConfig::new()
            .with_public_dir(dir.path().to_string_lossy().to_string())
            .with_tracing(false),
    );

    let request = Request::builder()
        .uri("/index.html")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<html>upload</html>");
}
