//! The publish pipeline: key derivation, store upload, presigning, cleanup.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::error::UploadError;
use crate::store::ObjectStore;

use super::key::derive_key;
use super::spool::TempSpool;

/// One extracted upload, ready to publish.
///
/// Owned exclusively by the handler invocation; the spool (and with it the
/// temp file) is destroyed when the publish attempt finishes.
pub struct UploadRequest {
    /// Spooled file contents.
    pub spool: TempSpool,

    /// Filename as declared by the client.
    pub original_name: String,

    /// Content type as declared by the client.
    pub declared_mime_type: String,

    /// Size of the spooled file in bytes.
    pub size_bytes: u64,
}

/// Result of a successful publish, returned to the caller as JSON.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Public location URL of the stored object.
    pub location_url: String,

    /// Time-limited presigned GET URL.
    pub signed_url: String,

    /// Storage key the object was stored under.
    pub storage_key: String,

    /// Integrity tag from the store.
    pub etag: String,

    /// Bucket the object was published into.
    pub bucket: String,
}

/// Drives the upload pipeline against an [`ObjectStore`].
///
/// Holds read-only configuration only, so a single instance is shared by
/// all concurrent requests.
pub struct UploadService<S: ObjectStore> {
    store: S,
    key_prefix: String,
    signed_url_ttl: Duration,
    upload_timeout: Duration,
}

impl<S: ObjectStore> UploadService<S> {
    /// Create a new upload service.
    pub fn new(
        store: S,
        key_prefix: impl Into<String>,
        signed_url_ttl: Duration,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            signed_url_ttl,
            upload_timeout,
        }
    }

    /// The underlying object store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publish one upload and generate its signed URL.
    ///
    /// The temp file is removed on every exit path: explicitly (and with
    /// logging) after the publish attempt, or by the spool's `Drop` if this
    /// future is cancelled mid-flight.
    pub async fn publish(&self, upload: UploadRequest) -> Result<PublishResult, UploadError> {
        let UploadRequest {
            mut spool,
            original_name,
            declared_mime_type,
            size_bytes,
        } = upload;

        let result = self
            .publish_spooled(&mut spool, &original_name, &declared_mime_type, size_bytes)
            .await;

        // Best-effort reap; failures are logged, never surfaced
        match spool.remove() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Removed temp file");
            }
            Err(e) => {
                warn!(error = %e, "Failed to remove temp file");
            }
        }

        result
    }

    async fn publish_spooled(
        &self,
        spool: &mut TempSpool,
        original_name: &str,
        declared_mime_type: &str,
        size_bytes: u64,
    ) -> Result<PublishResult, UploadError> {
        let key = derive_key(&self.key_prefix, unix_millis(), original_name);
        let body = spool.read()?;

        let stored = tokio::time::timeout(
            self.upload_timeout,
            self.store.put(&key, body, declared_mime_type),
        )
        .await
        .map_err(|_| UploadError::TimedOut {
            secs: self.upload_timeout.as_secs(),
        })??;

        let signed_url = self
            .store
            .presign_get(&key, self.signed_url_ttl)
            .await
            .map_err(UploadError::Store)?;

        info!(
            key = %key,
            bucket = %self.store.bucket(),
            size_bytes,
            content_type = %declared_mime_type,
            "Upload published"
        );

        Ok(PublishResult {
            location_url: stored.location_url,
            signed_url,
            storage_key: key,
            etag: stored.etag,
            bucket: self.store.bucket().to_string(),
        })
    }
}

/// Current wall-clock time as milliseconds since the Unix epoch.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
