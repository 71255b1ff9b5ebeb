//! wk10-search - image search front end
//!
//! Uploaded images are stored under the upload folder, sent to the vision
//! web-detection API, and the labels, entities and similar images rendered.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use wk10_common::config::{ensure_directory_exists, init_tracing, load_toml_config};
use wk10_search::config::{Args, SearchSettings, SearchToml};
use wk10_search::services::{Credentials, VisionClient};
use wk10_search::storage::LocalStorage;
use wk10_search::{build_router, AppState, MODULE_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_toml_config::<SearchToml>(MODULE_NAME, args.server.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&loaded.config.logging);

    // Logging is live from here on
    info!("Starting {} v{}", MODULE_NAME, env!("CARGO_PKG_VERSION"));
    loaded.source.log(MODULE_NAME);
    let toml = loaded.config;

    let settings = SearchSettings::resolve(&args, &toml);
    info!("Upload folder: {}", settings.upload_folder.display());
    info!("Credentials: {}", settings.credentials_path.display());
    info!(
        "Vision endpoint: {} (timeout {:?})",
        settings.vision_endpoint, settings.request_timeout
    );

    ensure_directory_exists(&settings.upload_folder)
        .context("Failed to create upload folder")?;

    let credentials = Credentials::from_file(&settings.credentials_path)
        .context("Failed to load vision credentials")?;
    let client = VisionClient::new(settings.vision_config(), credentials)
        .context("Failed to create vision client")?;
    info!("✓ Vision client ready");

    let state = AppState::new(
        Arc::new(client),
        LocalStorage::new(settings.upload_folder.clone()),
        settings.max_upload_bytes,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", settings.bind_address))?;
    info!("{} listening on http://{}", MODULE_NAME, settings.bind_address);
    info!("Health check: http://{}/health", settings.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(wk10_common::shutdown::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
