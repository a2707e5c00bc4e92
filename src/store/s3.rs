//! S3-backed implementation of [`ObjectStore`].
//!
//! Publishes objects with `PutObject` and generates presigned GET URLs.
//! Works against AWS S3 or any S3-compatible service (MinIO, etc.) via a
//! custom endpoint with path-style addressing.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{error, info};

use crate::error::StoreError;

use super::{ObjectStore, StoredObject};

/// S3-backed implementation of `ObjectStore`.
///
/// # Example
///
/// ```ignore
/// use upload_relay::store::{create_s3_client, S3ObjectStore};
///
/// let client = create_s3_client(None, "ap-south-1", None).await;
/// let store = S3ObjectStore::new(client, "my-bucket".to_string(), "ap-south-1".to_string(), None);
///
/// let stored = store.put("images/1700000000000-photo.png", body, "image/png").await?;
/// ```
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore for the given bucket.
    ///
    /// # Arguments
    /// * `client` - AWS S3 client to use for requests
    /// * `bucket` - S3 bucket name to publish into
    /// * `region` - AWS region, used to build public object URLs
    /// * `endpoint_url` - Custom endpoint for S3-compatible services
    pub fn new(
        client: Client,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        Self {
            client,
            bucket,
            region,
            endpoint_url,
        }
    }

    /// Build the public location URL for a stored object.
    ///
    /// AWS S3 uses the virtual-hosted format; custom endpoints use
    /// path-style to stay compatible with MinIO and friends.
    fn location_url(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StoreError> {
        let size = body.len();

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(
                    error = %display_sdk_error(&e),
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                classify_sdk_error(e)
            })?;

        let etag = result
            .e_tag()
            .map(|t| t.trim_matches('"').to_string())
            .unwrap_or_default();

        info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            etag = %etag,
            "S3 upload successful"
        );

        Ok(StoredObject {
            location_url: self.location_url(key),
            etag,
        })
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StoreError> {
        let presigning_config = PresigningConfig::expires_in(ttl)
            .map_err(|e| StoreError::Sign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| StoreError::Sign(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Classify an SDK error into the relay's store error taxonomy.
///
/// Service-side responses (policy, quota, invalid bucket) become `Rejected`;
/// everything that never reached the service (dispatch, timeout, response
/// construction) becomes `Unavailable`.
fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match &err {
        SdkError::ServiceError(_) => StoreError::Rejected(display_sdk_error(&err)),
        _ => StoreError::Unavailable(display_sdk_error(&err)),
    }
}

/// Render an SDK error with its service-level detail included.
fn display_sdk_error<E, R>(err: &SdkError<E, R>) -> String
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(service_err) => service_err.err().to_string(),
        other => other.to_string(),
    }
}

/// Create an S3 client with explicit credentials and an optional custom endpoint.
///
/// Credentials come from the relay's configuration. When either credential is
/// absent the SDK's default provider chain is used, which keeps the process
/// bootable with incomplete configuration (`/health` reports the gap and
/// `/upload` fails at first use).
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some(("key", "secret")), "us-east-1", Some("http://localhost:9000")).await;
/// ```
pub async fn create_s3_client(
    credentials: Option<(&str, &str)>,
    region: &str,
    endpoint_url: Option<&str>,
) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some((access_key, secret_key)) = credentials {
        let creds = aws_sdk_s3::config::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "upload-relay-config",
        );
        config_loader = config_loader.credentials_provider(creds);
    }

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services usually require path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
