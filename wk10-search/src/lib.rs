//! wk10-search library - image search front end
//!
//! Accepts an uploaded image, stores it under the upload folder, asks the
//! vision service for web detection and renders what comes back.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;
pub mod validators;

pub use crate::error::{SearchError, SearchResult};

use crate::services::Annotator;
use crate::storage::LocalStorage;

/// Module name used in logs, `/health` and the TOML file name
pub const MODULE_NAME: &str = "wk10-search";

/// URL prefix under which stored uploads are served back
pub const UPLOAD_URL_PREFIX: &str = "/static/tmp";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Web-detection backend
    pub annotator: Arc<dyn Annotator>,
    /// Where accepted uploads are written
    pub storage: LocalStorage,
    /// Request body cap for `POST /search`
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(annotator: Arc<dyn Annotator>, storage: LocalStorage, max_upload_bytes: usize) -> Self {
        Self {
            annotator,
            storage,
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.storage.base_dir());

    Router::new()
        .route("/", get(api::index))
        .route(
            "/search",
            get(api::index)
                .post(api::search)
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .nest_service(UPLOAD_URL_PREFIX, uploads)
        .merge(wk10_common::api::health_routes(
            MODULE_NAME,
            env!("CARGO_PKG_VERSION"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
