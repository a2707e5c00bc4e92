//! Configuration management for the upload relay.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables (the `KLYM_*` names the deployment already uses)
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use upload_relay::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("S3 bucket: {}", config.bucket());
//! ```
//!
//! # Environment Variables
//!
//! - `KLYM_HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `KLYM_AWS_ACCESS_KEY` - S3 access key credential (required)
//! - `KLYM_AWS_SECRET_KEY` - S3 secret key credential (required)
//! - `KLYM_S3_BUCKET` - S3 bucket name (required)
//! - `KLYM_AWS_REGION` - AWS region (default: ap-south-1)
//! - `KLYM_S3_ENDPOINT` - Custom endpoint for S3-compatible services
//! - `KLYM_KEY_PREFIX` - Storage key prefix (default: images)
//! - `KLYM_SIGNED_URL_TTL` - Presigned URL lifetime in seconds (default: 86400)
//! - `KLYM_UPLOAD_TIMEOUT` - Deadline for the store call in seconds (default: 120)
//! - `KLYM_MAX_UPLOAD_SIZE` - Request body limit in bytes (default: 100MB)
//! - `KLYM_PUBLIC_DIR` - Directory served for unmatched GET paths (default: public)
//! - `KLYM_CORS_ORIGINS` - Allowed CORS origins, comma-separated
//!
//! Missing required variables do NOT abort startup: the process listens,
//! `/health` reports the deficiency, and `/upload` fails at first use.

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "ap-south-1";

/// Bucket used when `KLYM_S3_BUCKET` is unset (matches the legacy deployment).
pub const DEFAULT_BUCKET: &str = "klym-products-bucket";

/// Default storage key prefix.
pub const DEFAULT_KEY_PREFIX: &str = "images";

/// Default presigned URL lifetime in seconds (24 hours).
pub const DEFAULT_SIGNED_URL_TTL: u64 = 86_400;

/// Default deadline for the object-store call in seconds.
pub const DEFAULT_UPLOAD_TIMEOUT: u64 = 120;

/// Default request body limit in bytes (100 MB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Default directory for static assets.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Environment variables that must be set for uploads to work.
pub const REQUIRED_ENV_VARS: [&str; 3] = [
    "KLYM_AWS_ACCESS_KEY",
    "KLYM_AWS_SECRET_KEY",
    "KLYM_S3_BUCKET",
];

// =============================================================================
// CLI Arguments
// =============================================================================

/// Upload relay - accepts file uploads over HTTP and publishes them to S3.
///
/// Receives a single multipart file per request, stores it in an S3 bucket
/// under a timestamped key, and responds with the object location and a
/// time-limited presigned URL.
#[derive(Parser, Debug, Clone)]
#[command(name = "upload-relay")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "KLYM_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // S3 Configuration
    // =========================================================================
    /// S3 access key credential.
    #[arg(long, env = "KLYM_AWS_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// S3 secret key credential.
    #[arg(long, env = "KLYM_AWS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// S3 bucket name to publish uploads into.
    #[arg(long, env = "KLYM_S3_BUCKET")]
    pub bucket: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "KLYM_AWS_REGION")]
    pub region: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "KLYM_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    // =========================================================================
    // Upload Configuration
    // =========================================================================
    /// Prefix prepended to every storage key.
    #[arg(long, default_value = DEFAULT_KEY_PREFIX, env = "KLYM_KEY_PREFIX")]
    pub key_prefix: String,

    /// Presigned URL lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_SIGNED_URL_TTL, env = "KLYM_SIGNED_URL_TTL")]
    pub signed_url_ttl: u64,

    /// Deadline in seconds for the object-store publish call.
    #[arg(long, default_value_t = DEFAULT_UPLOAD_TIMEOUT, env = "KLYM_UPLOAD_TIMEOUT")]
    pub upload_timeout: u64,

    /// Maximum accepted request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE, env = "KLYM_MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,

    // =========================================================================
    // Static Files / CORS
    // =========================================================================
    /// Directory served for unmatched GET paths.
    #[arg(long, default_value = DEFAULT_PUBLIC_DIR, env = "KLYM_PUBLIC_DIR")]
    pub public_dir: String,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "KLYM_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// List the required environment variables that are absent or empty.
    ///
    /// The order matches [`REQUIRED_ENV_VARS`] so `/health` output is stable.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = [
            non_empty(self.access_key.as_deref()),
            non_empty(self.secret_key.as_deref()),
            non_empty(self.bucket.as_deref()),
        ];

        REQUIRED_ENV_VARS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Validate the settings that have hard constraints.
    pub fn validate(&self) -> Result<(), String> {
        if self.signed_url_ttl == 0 {
            return Err("signed_url_ttl must be greater than 0".to_string());
        }
        if self.upload_timeout == 0 {
            return Err("upload_timeout must be greater than 0".to_string());
        }
        if self.max_upload_size == 0 {
            return Err("max_upload_size must be greater than 0".to_string());
        }
        if self.key_prefix.is_empty() || self.key_prefix.contains('/') {
            return Err("key_prefix must be a non-empty path segment".to_string());
        }
        Ok(())
    }

    /// Get the bucket name, falling back to the legacy default when unset.
    pub fn bucket(&self) -> &str {
        self.bucket.as_deref().unwrap_or(DEFAULT_BUCKET)
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.map(|v| !v.is_empty()).unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================
