//! HTTP server layer for the upload relay.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       HTTP Layer                           │
//! │        POST /upload   GET /test   GET /health   GET /*     │
//! │                                                            │
//! │  ┌──────────────┐               ┌──────────────────────┐   │
//! │  │   handlers   │               │        routes        │   │
//! │  │  (requests)  │               │   (router config)    │   │
//! │  └──────────────┘               └──────────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, test_handler, upload_handler, AppState, ErrorResponse, HealthErrorResponse,
    HealthOkResponse, TestResponse, UploadResponse,
};
pub use routes::{create_router, RouterConfig};
