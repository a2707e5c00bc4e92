//! Router configuration for the upload relay.
//!
//! # Route Structure
//!
//! ```text
//! POST /upload   - Publish one multipart file to the object store
//! GET  /test     - Liveness check
//! GET  /health   - Configuration health check
//! GET  /*        - Static assets from the public directory
//! ```
//!
//! # Example
//!
//! ```ignore
//! use upload_relay::server::{create_router, AppState, RouterConfig};
//!
//! let state = AppState::new(upload_service, "my-bucket", "ap-south-1", vec![]);
//! let router = create_router(state, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::DEFAULT_MAX_UPLOAD_SIZE;
use crate::store::ObjectStore;

use super::handlers::{health_handler, test_handler, upload_handler, AppState};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Directory served for unmatched GET paths
    pub public_dir: String,

    /// Maximum accepted request body size in bytes
    pub max_upload_size: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cors_origins: None, // Allow any origin by default
            public_dir: "public".to_string(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    /// Create a router configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the static asset directory.
    pub fn with_public_dir(mut self, dir: impl Into<String>) -> Self {
        self.public_dir = dir.into();
        self
    }

    /// Set the request body size limit in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with the upload, liveness, and health
/// routes, static file fallback, CORS, the body size limit, and optional
/// request tracing.
pub fn create_router<S>(state: AppState<S>, config: RouterConfig) -> Router
where
    S: ObjectStore + 'static,
{
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/upload", post(upload_handler::<S>))
        .route("/test", get(test_handler::<S>))
        .route("/health", get(health_handler::<S>))
        .with_state(state)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
