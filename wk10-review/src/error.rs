//! Error types for wk10-review

use thiserror::Error;

/// Startup error
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Model artifact missing or malformed; the process must not serve traffic
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Why a review submission was rejected
///
/// An expected outcome, shown inline on the re-rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a review.")]
    Required,

    #[error("Review must be at least {min} characters long (got {actual}).")]
    TooShort { min: usize, actual: usize },
}
