//! Linear bag-of-words model loaded from a JSON artifact
//!
//! Artifact layout:
//! ```json
//! {
//!   "labels": ["negative", "positive"],
//!   "intercept": -0.1,
//!   "weights": { "great": 1.7, "boring": -1.9 },
//!   "stop_words": ["the", "a"]
//! }
//! ```
//! Unknown tokens weigh nothing. Each occurrence of a known token adds its
//! weight, and the sigmoid of the total picks the label.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

use super::tokenizer::tokenize;
use super::{ClassificationResult, Classifier};
use crate::error::ReviewError;

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    labels: Vec<String>,
    #[serde(default)]
    intercept: f64,
    weights: HashMap<String, f64>,
    #[serde(default)]
    stop_words: Vec<String>,
}

/// Binary linear text classifier
#[derive(Debug, Clone)]
pub struct LinearTextModel {
    negative_label: String,
    positive_label: String,
    intercept: f64,
    weights: HashMap<String, f64>,
    stop_words: HashSet<String>,
}

impl LinearTextModel {
    /// Load the artifact at `path`
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReviewError::ModelUnavailable(format!("read {} failed: {}", path.display(), e))
        })?;
        let model = Self::from_json(&content)?;

        info!(
            path = %path.display(),
            vocabulary = model.weights.len(),
            negative = %model.negative_label,
            positive = %model.positive_label,
            "Loaded classification model"
        );
        Ok(model)
    }

    /// Parse artifact JSON
    pub fn from_json(content: &str) -> Result<Self, ReviewError> {
        let artifact: ModelArtifact = serde_json::from_str(content)
            .map_err(|e| ReviewError::ModelUnavailable(format!("invalid artifact: {}", e)))?;

        let [negative_label, positive_label]: [String; 2] =
            artifact.labels.try_into().map_err(|labels: Vec<String>| {
                ReviewError::ModelUnavailable(format!(
                    "expected exactly 2 labels, found {}",
                    labels.len()
                ))
            })?;

        if let Some((token, _)) = artifact.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(ReviewError::ModelUnavailable(format!(
                "weight for {:?} is not finite",
                token
            )));
        }
        if !artifact.intercept.is_finite() {
            return Err(ReviewError::ModelUnavailable(
                "intercept is not finite".to_string(),
            ));
        }

        Ok(Self {
            negative_label,
            positive_label,
            intercept: artifact.intercept,
            weights: artifact.weights,
            stop_words: artifact.stop_words.into_iter().collect(),
        })
    }

    /// Raw linear score: intercept plus the weight of every token occurrence
    pub fn decision(&self, text: &str) -> f64 {
        tokenize(text, &self.stop_words)
            .iter()
            .filter_map(|token| self.weights.get(token))
            .fold(self.intercept, |acc, w| acc + w)
    }

    /// Probability of the positive label
    pub fn positive_probability(&self, text: &str) -> f64 {
        sigmoid(self.decision(text))
    }
}

impl Classifier for LinearTextModel {
    fn classify(&self, text: &str) -> ClassificationResult {
        let p = self.positive_probability(text);
        if p >= 0.5 {
            ClassificationResult {
                label: self.positive_label.clone(),
                probability: p,
            }
        } else {
            ClassificationResult {
                label: self.negative_label.clone(),
                probability: 1.0 - p,
            }
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
