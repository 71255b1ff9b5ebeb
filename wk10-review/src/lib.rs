//! wk10-review library - movie review classifier
//!
//! A single-field form whose text is validated and then classified by a
//! model artifact loaded once at startup.

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod form;

pub use crate::error::{ReviewError, ValidationError};

use crate::classifier::Classifier;

/// Module name used in logs, `/health` and the TOML file name
pub const MODULE_NAME: &str = "wk10-review";

/// Application state shared across handlers
///
/// The classifier is immutable after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/results", post(api::results))
        .merge(wk10_common::api::health_routes(
            MODULE_NAME,
            env!("CARGO_PKG_VERSION"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
