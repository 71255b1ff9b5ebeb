//! wk10-review - movie review classifier
//!
//! The model artifact is loaded before the listener binds; a missing or
//! malformed artifact stops startup.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use wk10_common::config::{init_tracing, load_toml_config};
use wk10_review::classifier::LinearTextModel;
use wk10_review::config::{Args, ReviewSettings, ReviewToml};
use wk10_review::{build_router, AppState, MODULE_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_toml_config::<ReviewToml>(MODULE_NAME, args.server.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&loaded.config.logging);

    // Logging is live from here on
    info!("Starting {} v{}", MODULE_NAME, env!("CARGO_PKG_VERSION"));
    loaded.source.log(MODULE_NAME);
    let toml = loaded.config;

    let settings = ReviewSettings::resolve(&args, &toml);
    info!("Model artifact: {}", settings.model_path.display());

    let model = LinearTextModel::load(&settings.model_path)
        .with_context(|| format!("Failed to load model from {}", settings.model_path.display()))?;
    info!("✓ Model ready");

    let app = build_router(AppState::new(Arc::new(model)));

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
