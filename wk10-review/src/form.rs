//! Review form validation

use serde::Deserialize;

use crate::error::ValidationError;

/// Minimum review length in characters, after trimming
pub const MIN_REVIEW_LENGTH: usize = 15;

/// Raw `POST /results` body
#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub moviereview: String,
}

/// A review that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    /// Text exactly as submitted
    pub text: String,
}

/// Check the submitted text; rules are applied in order and the first failure returned
pub fn validate(text: &str) -> Result<ReviewSubmission, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }

    let length = trimmed.chars().count();
    if length < MIN_REVIEW_LENGTH {
        return Err(ValidationError::TooShort {
            min: MIN_REVIEW_LENGTH,
            actual: length,
        });
    }

    Ok(ReviewSubmission {
        text: text.to_string(),
    })
}
