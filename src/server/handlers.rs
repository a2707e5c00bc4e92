//! HTTP request handlers for the upload relay.
//!
//! # Endpoints
//!
//! - `POST /upload` - Accept one multipart file and publish it to the store
//! - `GET /test` - Liveness check with server timestamp
//! - `GET /health` - Configuration health check

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::UploadError;
use crate::store::ObjectStore;
use crate::upload::{TempSpool, UploadRequest, UploadService};

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// Content type assumed when the client declares none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state, passed to all handlers via Axum's State extractor.
///
/// Everything here is read-only after startup, so concurrent requests share
/// it freely.
pub struct AppState<S: ObjectStore> {
    /// The upload service driving the publish pipeline
    pub upload_service: Arc<UploadService<S>>,

    /// Configured bucket name, echoed in responses
    pub bucket: String,

    /// Configured region, echoed in responses
    pub region: String,

    /// Required environment variables that were absent at startup
    pub missing_config: Vec<&'static str>,
}

impl<S: ObjectStore> AppState<S> {
    /// Create a new application state.
    pub fn new(
        upload_service: UploadService<S>,
        bucket: impl Into<String>,
        region: impl Into<String>,
        missing_config: Vec<&'static str>,
    ) -> Self {
        Self {
            upload_service: Arc::new(upload_service),
            bucket: bucket.into(),
            region: region.into(),
            missing_config,
        }
    }
}

impl<S: ObjectStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            upload_service: Arc::clone(&self.upload_service),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            missing_config: self.missing_config.clone(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,

    /// Public location URL of the stored object
    pub url: String,

    /// Time-limited presigned GET URL
    #[serde(rename = "signedUrl")]
    pub signed_url: String,

    /// Storage key the object was stored under
    pub key: String,

    /// Integrity tag from the store
    pub etag: String,

    /// Bucket the object was published into
    pub bucket: String,
}

/// JSON error response for upload failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error description
    pub error: String,

    /// Underlying failure message (500s only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Liveness check response.
#[derive(Debug, Serialize)]
pub struct TestResponse {
    /// Human-readable status
    pub message: String,

    /// Server time, ISO-8601
    pub timestamp: String,

    /// Configured bucket
    pub bucket: String,

    /// Configured region
    pub region: String,
}

/// Health check response when all required configuration is present.
#[derive(Debug, Serialize)]
pub struct HealthOkResponse {
    /// Always `"ok"`
    pub status: String,

    /// Human-readable status
    pub message: String,

    /// Configured bucket
    pub bucket: String,

    /// Configured region
    pub region: String,
}

/// Health check response when required configuration is missing.
#[derive(Debug, Serialize)]
pub struct HealthErrorResponse {
    /// Always `"error"`
    pub status: String,

    /// Human-readable status
    pub message: String,

    /// Names of the absent environment variables
    pub missing: Vec<&'static str>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert UploadError to an HTTP response.
///
/// `MissingFile` is the only client error (400); everything else collapses
/// to a 500 with the underlying message in `details`, matching the relay's
/// wire contract. 5xx errors are logged at ERROR, 4xx at WARN.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            UploadError::MissingFile => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "No file provided".to_string(),
                    details: None,
                },
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Upload failed".to_string(),
                    details: Some(other.to_string()),
                },
            ),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "Upload error: {}", self);
        } else {
            warn!(status = status.as_u16(), "Upload rejected: {}", self);
        }

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle upload requests.
///
/// # Endpoint
///
/// `POST /upload` with a `multipart/form-data` body containing one file
/// field named `file`.
///
/// # Response
///
/// - `200 OK`: `{message, url, signedUrl, key, etag, bucket}`
/// - `400 Bad Request`: `{"error":"No file provided"}` when the field is
///   absent or the body is not multipart
/// - `500 Internal Server Error`: `{"error":"Upload failed","details":...}`
///   for store, signing, spool, or deadline failures
pub async fn upload_handler<S: ObjectStore>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    // A missing or non-multipart body surfaces as a failed extraction
    let mut multipart = multipart.map_err(|_| UploadError::MissingFile)?;

    let upload = extract_file_field(&mut multipart).await?;

    tracing::debug!(
        original_name = %upload.original_name,
        content_type = %upload.declared_mime_type,
        size_bytes = upload.size_bytes,
        "File received"
    );

    let result = state.upload_service.publish(upload).await?;

    Ok(Json(UploadResponse {
        message: "Upload successful".to_string(),
        url: result.location_url,
        signed_url: result.signed_url,
        key: result.storage_key,
        etag: result.etag,
        bucket: result.bucket,
    }))
}

/// Pull the `file` field out of the multipart body and spool it to disk.
///
/// Other fields are drained and ignored. Returns `MissingFile` if the body
/// ends without a `file` field.
async fn extract_file_field(multipart: &mut Multipart) -> Result<UploadRequest, UploadError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .unwrap_or(FILE_FIELD)
            .to_string();
        let declared_mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let mut spool = TempSpool::new()?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?
        {
            spool.write_chunk(&chunk)?;
        }

        let size_bytes = spool.size();
        return Ok(UploadRequest {
            spool,
            original_name,
            declared_mime_type,
            size_bytes,
        });
    }

    Err(UploadError::MissingFile)
}

/// Handle liveness check requests.
///
/// # Endpoint
///
/// `GET /test`
///
/// Always returns `200 OK` regardless of configuration state:
/// ```json
/// {
///   "message": "Server is running!",
///   "timestamp": "2024-01-01T00:00:00.000Z",
///   "bucket": "my-bucket",
///   "region": "ap-south-1"
/// }
/// ```
pub async fn test_handler<S: ObjectStore>(
    State(state): State<AppState<S>>,
) -> Json<TestResponse> {
    Json(TestResponse {
        message: "Server is running!".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        bucket: state.bucket.clone(),
        region: state.region.clone(),
    })
}

/// Handle configuration health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` `{status:"ok", message, bucket, region}` when all required
///   environment variables were present at startup
/// - `500 Internal Server Error` `{status:"error", message, missing:[...]}`
///   listing exactly the absent variable names otherwise
///
/// Presence is all that is checked; credentials are not validated against
/// the real store.
pub async fn health_handler<S: ObjectStore>(State(state): State<AppState<S>>) -> Response {
    if state.missing_config.is_empty() {
        return Json(HealthOkResponse {
            status: "ok".to_string(),
            message: "All environment variables configured".to_string(),
            bucket: state.bucket.clone(),
            region: state.region.clone(),
        })
        .into_response();
    }

    warn!(
        missing = ?state.missing_config,
        "Health check failed: missing required environment variables"
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(HealthErrorResponse {
            status: "error".to_string(),
            message: "Missing required environment variables".to_string(),
            missing: state.missing_config.clone(),
        }),
    )
        .into_response()
}

// =============================================================================
// Tests
// =============================================================================
