//! Upload Relay - accepts file uploads over HTTP and publishes them to S3.
//!
//! This binary starts the HTTP server and wires together all components.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upload_relay::{
    config::Config,
    server::{create_router, AppState, RouterConfig},
    store::{create_s3_client, S3ObjectStore},
    upload::UploadService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate hard constraints
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let bucket = config.bucket().to_string();
    let missing = config.missing_required();

    info!("Configuration:");
    info!("  S3 bucket: {}", bucket);
    info!("  S3 region: {}", config.region);
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  Key prefix: {}/", config.key_prefix);
    info!("  Signed URL TTL: {}s", config.signed_url_ttl);

    // Missing credentials do not abort startup; /health reports the gap
    // and /upload fails at first use.
    if !missing.is_empty() {
        warn!("Missing environment variables: {}", missing.join(", "));
        warn!("Create a .env file with:");
        warn!("  KLYM_AWS_ACCESS_KEY=your_access_key");
        warn!("  KLYM_AWS_SECRET_KEY=your_secret_key");
        warn!("  KLYM_S3_BUCKET=your_bucket_name");
        warn!("  KLYM_AWS_REGION=ap-south-1");
    } else {
        info!("All environment variables configured");
    }

    // Create S3 client with configured credentials
    let credentials = match (config.access_key.as_deref(), config.secret_key.as_deref()) {
        (Some(access), Some(secret)) if !access.is_empty() && !secret.is_empty() => {
            Some((access, secret))
        }
        _ => None,
    };
    let s3_client =
        create_s3_client(credentials, &config.region, config.s3_endpoint.as_deref()).await;

    // Build the pipeline
    let store = S3ObjectStore::new(
        s3_client,
        bucket.clone(),
        config.region.clone(),
        config.s3_endpoint.clone(),
    );
    let upload_service = UploadService::new(
        store,
        config.key_prefix.clone(),
        Duration::from_secs(config.signed_url_ttl),
        Duration::from_secs(config.upload_timeout),
    );

    let state = AppState::new(upload_service, bucket, config.region.clone(), missing);

    // Build the router
    let router_config = build_router_config(&config);
    let router = create_router(state, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("Server running on http://{}", addr);
    info!("  Upload endpoint: http://{}/upload", addr);
    info!("  Test endpoint:   http://{}/test", addr);
    info!("  Health check:    http://{}/health", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "upload_relay=debug,tower_http=debug"
    } else {
        "upload_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_public_dir(config.public_dir.clone())
        .with_max_upload_size(config.max_upload_size)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
