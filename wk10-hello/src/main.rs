//! wk10-hello - greeting pages
//!
//! Serves `/` and `/sayhi` as fixed HTML.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wk10_common::config::{init_tracing, load_toml_config};
use wk10_hello::{Args, HelloToml, DEFAULT_PORT, MODULE_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_toml_config::<HelloToml>(MODULE_NAME, args.server.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&loaded.config.logging);

    // Logging is live from here on
    info!("Starting {} v{}", MODULE_NAME, env!("CARGO_PKG_VERSION"));
    loaded.source.log(MODULE_NAME);
    let toml = loaded.config;

    let addr = args
        .server
        .bind_address(toml.host.as_deref(), toml.port, DEFAULT_PORT);

    let app = wk10_hello::build_router();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("{} listening on http://{}", MODULE_NAME, addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wk10_common::shutdown::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
