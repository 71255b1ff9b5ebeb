//! Text classification backend

pub mod model;
pub mod tokenizer;

pub use model::LinearTextModel;

/// Label and confidence for one text
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    /// Confidence of `label`, in `[0.5, 1.0]`
    pub probability: f64,
}

/// Maps a text to a label
///
/// Implementations must be deterministic and safe to share across requests.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> ClassificationResult;
}
