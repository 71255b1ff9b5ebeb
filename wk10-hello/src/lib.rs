//! wk10-hello library - greeting pages
//!
//! Two static routes plus the shared health check.

use axum::{response::Html, routing::get, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use wk10_common::config::{LoggingConfig, ServerArgs};

/// Module name used in logs and `/health`
pub const MODULE_NAME: &str = "wk10-hello";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Command-line arguments for wk10-hello
#[derive(clap::Parser, Debug)]
#[command(name = "wk10-hello")]
#[command(about = "Greeting pages")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,
}

/// `wk10-hello.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HelloToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub logging: LoggingConfig,
}

/// GET /
pub async fn welcome() -> Html<&'static str> {
    Html("<h1>Welcome to my page!</h1>")
}

/// GET /sayhi
pub async fn say_hi() -> Html<&'static str> {
    Html("<h1>Hello, World!</h1>")
}

/// Build application router
pub fn build_router() -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/sayhi", get(say_hi))
        .merge(wk10_common::api::health_routes(
            MODULE_NAME,
            env!("CARGO_PKG_VERSION"),
        ))
        .layer(TraceLayer::new_for_http())
}
