//! Upload pipeline for the relay.
//!
//! A request moves through one straight-line pipeline:
//!
//! ```text
//! multipart field -> TempSpool -> derive_key -> ObjectStore::put
//!                 -> ObjectStore::presign_get -> PublishResult
//! ```
//!
//! The spool owns the temp file and deletes it on every exit path.

pub mod key;
pub mod service;
pub mod spool;

pub use key::{derive_key, sanitize_filename};
pub use service::{PublishResult, UploadRequest, UploadService};
pub use spool::TempSpool;
