//! Health check endpoint
//!
//! Every app mounts the same `/health` route; only the module name differs.

use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name (e.g. "wk10-search")
    pub module: String,
    /// Crate version of the serving binary
    pub version: String,
    /// Seconds since the router was built
    pub uptime_seconds: u64,
}

impl HealthResponse {
    fn new(module: &str, version: &str, started: DateTime<Utc>) -> Self {
        let uptime = Utc::now().signed_duration_since(started);
        Self {
            status: "ok".to_string(),
            module: module.to_string(),
            version: version.to_string(),
            uptime_seconds: uptime.num_seconds().max(0) as u64,
        }
    }
}

/// Build `GET /health` for a module
///
/// Generic over the router state so it can be merged into any app router.
pub fn health_routes<S>(module: &'static str, version: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let started = Utc::now();
    Router::new().route(
        "/health",
        get(move || async move { Json(HealthResponse::new(module, version, started)) }),
    )
}
