//! Error types for wk10-search
//!
//! Upload validation failures are not errors: the handler re-renders the
//! form. Everything here ends up as a generic failure page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Search request / startup error
#[derive(Debug, Error)]
pub enum SearchError {
    /// Storage or image read failure (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Vision service reported an error message (502)
    #[error("Vision service error: {0}")]
    Service(String),

    /// Transport failure talking to the vision service: timeout, DNS, TLS (502)
    #[error("Network error: {0}")]
    Network(String),

    /// Vision service answered with a body we could not decode (502)
    #[error("Invalid vision response: {0}")]
    InvalidResponse(String),

    /// Credential file missing or unusable (fatal at startup)
    #[error("Credentials error: {0}")]
    Credentials(String),
}

impl SearchError {
    /// HTTP status used for the failure page
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Io(_) | SearchError::Credentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::Service(_) | SearchError::Network(_) | SearchError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            SearchError::InvalidResponse(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(status = status.as_u16(), error = %self, "Search request failed");
        wk10_common::html::error_page(status)
    }
}

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;
