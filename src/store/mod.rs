//! Object-store layer for the upload relay.
//!
//! Defines the [`ObjectStore`] trait that the upload pipeline publishes
//! through, and the S3-backed implementation. The trait seam keeps the
//! HTTP layer testable without a running S3 service.

pub mod s3;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

pub use s3::{create_s3_client, S3ObjectStore};

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Public location URL of the stored object.
    pub location_url: String,

    /// Integrity tag returned by the store.
    pub etag: String,
}

/// A destination that uploaded files can be published to.
///
/// Implementations must be safe to share across concurrent requests;
/// the relay holds a single instance for the lifetime of the process.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` with the given content type.
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StoreError>;

    /// Generate a time-limited presigned GET URL for `key`.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StoreError>;

    /// The bucket this store publishes into.
    fn bucket(&self) -> &str;
}
