use thiserror::Error;

/// Errors returned by the object-store layer.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached (network, DNS, connection, deadline).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request (bucket policy, quota, invalid bucket).
    #[error("Store rejected request: {0}")]
    Rejected(String),

    /// The credentials could not produce a presigned URL.
    #[error("Signing failed: {0}")]
    Sign(String),
}

/// Errors that can occur while handling an upload request.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The multipart body contained no `file` field (or no body at all).
    #[error("No file provided")]
    MissingFile,

    /// The multipart body could not be read.
    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    /// Spooling the upload to a local temp file failed.
    #[error("Temp file error: {0}")]
    Spool(#[from] std::io::Error),

    /// The object store returned an error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The publish call did not complete within the configured deadline.
    #[error("Upload to object store timed out after {secs}s")]
    TimedOut { secs: u64 },
}
