//! # Upload Relay
//!
//! A small HTTP relay that accepts file uploads and publishes them to S3
//! (or any S3-compatible object store), returning a public location URL and
//! a time-limited presigned access URL.
//!
//! Each request moves through one straight-line pipeline: the multipart
//! body is spooled to a uniquely named temp file, published to the bucket
//! under a timestamped key, presigned for retrieval, and the temp file is
//! reaped on every exit path.
//!
//! ## Architecture
//!
//! - [`store`] - Object-store trait seam and the S3 implementation
//! - [`upload`] - Key derivation, temp spooling, and the publish pipeline
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error taxonomy shared across layers

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod upload;

// Re-export commonly used types
pub use config::{Config, REQUIRED_ENV_VARS};
pub use error::{StoreError, UploadError};
pub use server::{create_router, AppState, RouterConfig};
pub use store::{create_s3_client, ObjectStore, S3ObjectStore, StoredObject};
pub use upload::{derive_key, sanitize_filename, PublishResult, TempSpool, UploadRequest, UploadService};
