//! Image annotation backends

pub mod credentials;
pub mod vision_client;

pub use credentials::{Credentials, ServiceAccount};
pub use vision_client::{VisionClient, VisionConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SearchResult;

/// A web entity as reported by the vision service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebEntity {
    pub entity_id: Option<String>,
    pub score: Option<f32>,
    pub description: Option<String>,
}

/// Normalized web-detection result for one image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationResult {
    /// Best-guess labels joined with `,`; `None` when there are none
    pub best_guess_label: Option<String>,
    /// Entities in service order
    pub web_entities: Vec<WebEntity>,
    /// Visually similar image URLs in service order
    pub similar_image_urls: Vec<String>,
}

/// Something that can describe an image stored on disk
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Read the image at `image_path` and return its web-detection result
    async fn annotate(&self, image_path: &Path) -> SearchResult<AnnotationResult>;
}
