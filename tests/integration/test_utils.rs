//! Test utilities for integration tests.
//!
//! Provides a mock object store with request tracking and failure
//! injection, plus helpers for building multipart requests and routers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use bytes::Bytes;

use upload_relay::error::StoreError;
use upload_relay::server::{create_router, AppState, RouterConfig};
use upload_relay::store::{ObjectStore, StoredObject};
use upload_relay::upload::UploadService;

/// Bucket name used by the mock store and test state.
pub const TEST_BUCKET: &str = "test-bucket";

/// Region echoed by the test state.
pub const TEST_REGION: &str = "ap-south-1";

// =============================================================================
// Mock Object Store
// =============================================================================

/// One recorded put call.
#[derive(Debug, Clone)]
pub struct PutRecord {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// A mock object store that records puts and can inject failures.
///
/// Clones share the same recording, so tests can keep a handle after the
/// router takes ownership.
#[derive(Clone)]
pub struct MockObjectStore {
    puts: Arc<Mutex<Vec<PutRecord>>>,
    put_failure: Option<StoreError>,
    sign_failure: Option<StoreError>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            puts: Arc::new(Mutex::new(Vec::new())),
            put_failure: None,
            sign_failure: None,
        }
    }

    /// Make every put call fail with the given error.
    pub fn with_put_failure(mut self, err: StoreError) -> Self {
        self.put_failure = Some(err);
        self
    }

    /// Make every presign call fail with the given error.
    pub fn with_sign_failure(mut self, err: StoreError) -> Self {
        self.sign_failure = Some(err);
        self
    }

    /// All puts recorded so far.
    pub fn recorded_puts(&self) -> Vec<PutRecord> {
        self.puts.lock().unwrap().clone()
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StoreError> {
        if let Some(err) = &self.put_failure {
            return Err(err.clone());
        }

        self.puts.lock().unwrap().push(PutRecord {
            key: key.to_string(),
            body: body.to_vec(),
            content_type: content_type.to_string(),
        });

        Ok(StoredObject {
            location_url: format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                TEST_BUCKET, TEST_REGION, key
            ),
            etag: "mock-etag-1234".to_string(),
        })
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StoreError> {
        if let Some(err) = &self.sign_failure {
            return Err(err.clone());
        }

        Ok(format!(
            "https://{}.s3.{}.amazonaws.com/{}?X-Amz-Expires={}&X-Amz-Signature=deadbeef",
            TEST_BUCKET,
            TEST_REGION,
            key,
            ttl.as_secs()
        ))
    }

    fn bucket(&self) -> &str {
        TEST_BUCKET
    }
}

// =============================================================================
// Router / State Builders
// =============================================================================

/// Build application state around the given mock store.
pub fn test_state(store: MockObjectStore, missing: Vec<&'static str>) -> AppState<MockObjectStore> {
    let service = UploadService::new(
        store,
        "images",
        Duration::from_secs(86_400),
        Duration::from_secs(5),
    );
    AppState::new(service, TEST_BUCKET, TEST_REGION, missing)
}

/// Build a router with a fully configured mock environment.
pub fn test_router(store: MockObjectStore) -> Router {
    create_router(test_state(store, vec![]), test_router_config())
}

/// Build a router whose health check reports the given missing variables.
pub fn test_router_with_missing(store: MockObjectStore, missing: Vec<&'static str>) -> Router {
    create_router(test_state(store, missing), test_router_config())
}

/// Router config pointing the static fallback at a directory that does
/// not exist, so unmatched paths 404.
fn test_router_config() -> RouterConfig {
    RouterConfig::new()
        .with_public_dir("nonexistent-public-dir")
        .with_tracing(false)
}

// =============================================================================
// Multipart Request Builders
// =============================================================================

/// Boundary used for hand-built multipart bodies.
pub const BOUNDARY: &str = "X-TEST-BOUNDARY";

/// Build a multipart POST /upload request with a single field.
pub fn multipart_upload_request(
    field_name: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Build a multipart POST /upload request containing only a text field
/// (no file part at all).
pub fn multipart_text_only_request(field_name: &str, value: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"\r\n\r\n{v}\r\n--{b}--\r\n",
        b = BOUNDARY,
        n = field_name,
        v = value
    );

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Current wall-clock time as milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
