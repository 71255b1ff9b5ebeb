//! Cloud Vision web-detection client
//!
//! Sends one `WEB_DETECTION` request per image to `images:annotate` and
//! normalizes the reply into an [`AnnotationResult`].

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::credentials::{Credentials, ServiceAccount};
use super::{AnnotationResult, Annotator, WebEntity};
use crate::error::{SearchError, SearchResult};

/// Public vision endpoint (scheme + host)
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";
const ANNOTATE_PATH: &str = "/v1/images:annotate";
const USER_AGENT: &str = concat!("wk10-search/", env!("CARGO_PKG_VERSION"));
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Cached tokens are refreshed this long before they expire
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on a token's advertised lifetime
const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    /// Base64-encoded image bytes
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

/// Batch reply from `images:annotate`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnotateResponse {
    pub responses: Vec<AnnotateImageResponse>,
}

/// Reply for a single image
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub web_detection: Option<WebDetection>,
    pub error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebDetection {
    pub best_guess_labels: Vec<BestGuessLabel>,
    pub web_entities: Vec<WebEntity>,
    pub visually_similar_images: Vec<WebImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BestGuessLabel {
    pub label: String,
    pub language_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebImage {
    pub url: String,
}

/// Google RPC status
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Status {
    pub code: i32,
    pub message: String,
}

/// Body of a non-2xx reply
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
    error: Status,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_lifetime")]
    expires_in: u64,
}

fn default_token_lifetime() -> u64 {
    3600
}

impl AnnotationResult {
    /// Normalize one per-image reply
    ///
    /// A non-empty upstream error wins over any partial payload. Missing
    /// sections become empty lists / `None`.
    pub fn from_response(response: AnnotateImageResponse) -> SearchResult<Self> {
        if let Some(status) = response.error {
            if !status.message.is_empty() {
                return Err(SearchError::Service(status.message));
            }
        }

        let detection = response.web_detection.unwrap_or_default();

        let labels: Vec<String> = detection
            .best_guess_labels
            .into_iter()
            .map(|l| l.label)
            .filter(|l| !l.is_empty())
            .collect();
        let best_guess_label = if labels.is_empty() {
            None
        } else {
            Some(labels.join(","))
        };

        Ok(Self {
            best_guess_label,
            web_entities: detection.web_entities,
            similar_image_urls: detection
                .visually_similar_images
                .into_iter()
                .map(|image| image.url)
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client settings
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Scheme + host, without the `/v1/...` path
    pub endpoint: String,
    /// Whole-request timeout; expiry surfaces as [`SearchError::Network`]
    pub timeout: Duration,
    /// `maxResults` for the web-detection feature (service default when `None`)
    pub max_results: Option<u32>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            max_results: None,
        }
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Web-detection client
pub struct VisionClient {
    http_client: reqwest::Client,
    config: VisionConfig,
    credentials: Credentials,
    token_cache: Mutex<Option<CachedToken>>,
}

impl VisionClient {
    pub fn new(config: VisionConfig, credentials: Credentials) -> SearchResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            credentials,
            token_cache: Mutex::new(None),
        })
    }

    fn annotate_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            ANNOTATE_PATH
        )
    }

    /// Run web detection on raw image bytes
    pub async fn web_detection(&self, image: &[u8]) -> SearchResult<AnnotationResult> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "WEB_DETECTION",
                    max_results: self.config.max_results,
                }],
            }],
        };

        tracing::debug!(bytes = image.len(), "Querying vision web detection");

        let request = self.http_client.post(self.annotate_url()).json(&body);
        let response = self.authorize(request).await?.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .map(|envelope| envelope.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SearchError::Service(message));
        }

        let batch: AnnotateResponse = response.json().await?;

        let first = batch.responses.into_iter().next().unwrap_or_default();
        let result = AnnotationResult::from_response(first)?;

        tracing::info!(
            best_guess = result.best_guess_label.as_deref().unwrap_or("-"),
            entities = result.web_entities.len(),
            similar_images = result.similar_image_urls.len(),
            "Web detection complete"
        );

        Ok(result)
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> SearchResult<reqwest::RequestBuilder> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            Credentials::ServiceAccount(account) => {
                let token = self.access_token(account).await?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    /// Cached bearer token, minted via the JWT-bearer grant when stale
    async fn access_token(&self, account: &ServiceAccount) -> SearchResult<String> {
        let mut cache = self.token_cache.lock().await;

        if let Some(token) = cache.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.access_token.clone());
            }
        }

        let assertion = account.signed_assertion(chrono::Utc::now().timestamp())?;
        let response = self
            .http_client
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Service(format!(
                "token exchange failed ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = response.json().await?;

        tracing::debug!(expires_in = token.expires_in, "Obtained vision access token");

        let access_token = token.access_token.clone();
        *cache = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(token.expires_in.min(MAX_TOKEN_LIFETIME_SECS)),
        });

        Ok(access_token)
    }
}

#[async_trait]
impl Annotator for VisionClient {
    async fn annotate(&self, image_path: &Path) -> SearchResult<AnnotationResult> {
        let image = tokio::fs::read(image_path).await?;
        self.web_detection(&image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnnotateImageResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_best_guess_labels_joined() {
        let response = parse(
            r#"{"webDetection": {"bestGuessLabels": [{"label": "cat"}, {"label": "feline"}]}}"#,
        );
        let result = AnnotationResult::from_response(response).unwrap();
        assert_eq!(result.best_guess_label.as_deref(), Some("cat,feline"));
    }

    #[test]
    fn test_empty_best_guess_labels_absent() {
        let response = parse(r#"{"webDetection": {"bestGuessLabels": []}}"#);
        let result = AnnotationResult::from_response(response).unwrap();
        assert_eq!(result.best_guess_label, None);
    }

    #[test]
    fn test_blank_labels_do_not_produce_empty_string() {
        let response = parse(r#"{"webDetection": {"bestGuessLabels": [{"label": ""}]}}"#);
        let result = AnnotationResult::from_response(response).unwrap();
        assert_eq!(result.best_guess_label, None);
    }

    #[test]
    fn test_error_message_is_service_error() {
        let response = parse(
            r#"{"error": {"code": 3, "message": "Bad image data."},
                "webDetection": {"bestGuessLabels": [{"label": "cat"}]}}"#,
        );
        let err = AnnotationResult::from_response(response).unwrap_err();
        assert!(matches!(err, SearchError::Service(msg) if msg == "Bad image data."));
    }

    #[test]
    fn test_empty_error_message_ignored() {
        let response = parse(r#"{"error": {"code": 0, "message": ""}}"#);
        assert!(AnnotationResult::from_response(response).is_ok());
    }

    #[test]
    fn test_missing_sections_degrade_to_empty() {
        let result = AnnotationResult::from_response(parse("{}")).unwrap();
        assert_eq!(result, AnnotationResult::default());

        let result = AnnotationResult::from_response(parse(r#"{"webDetection": {}}"#)).unwrap();
        assert_eq!(result, AnnotationResult::default());
    }

    #[test]
    fn test_entities_and_images_keep_service_order() {
        let response = parse(
            r#"{"webDetection": {
                "webEntities": [
                    {"entityId": "/m/01", "score": 0.4, "description": "Tabby"},
                    {"entityId": "/m/02", "score": 0.9, "description": "Cat"},
                    {"score": 0.1}
                ],
                "visuallySimilarImages": [
                    {"url": "https://img.example/b.jpg"},
                    {"url": "https://img.example/a.jpg"}
                ]
            }}"#,
        );
        let result = AnnotationResult::from_response(response).unwrap();

        let descriptions: Vec<_> = result
            .web_entities
            .iter()
            .map(|e| e.description.as_deref())
            .collect();
        assert_eq!(descriptions, vec![Some("Tabby"), Some("Cat"), None]);
        assert_eq!(result.web_entities[1].entity_id.as_deref(), Some("/m/02"));
        assert_eq!(
            result.similar_image_urls,
            vec!["https://img.example/b.jpg", "https://img.example/a.jpg"]
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: "AAEC".to_string(),
                },
                features: vec![Feature {
                    kind: "WEB_DETECTION",
                    max_results: None,
                }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requests"][0]["image"]["content"], "AAEC");
        assert_eq!(json["requests"][0]["features"][0]["type"], "WEB_DETECTION");
        assert!(json["requests"][0]["features"][0].get("maxResults").is_none());
    }

    #[test]
    fn test_annotate_url_trims_trailing_slash() {
        let client = VisionClient::new(
            VisionConfig {
                endpoint: "http://localhost:9999/".to_string(),
                ..Default::default()
            },
            Credentials::ApiKey("k".to_string()),
        )
        .unwrap();
        assert_eq!(client.annotate_url(), "http://localhost:9999/v1/images:annotate");
    }
}
