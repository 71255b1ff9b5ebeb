//! Vision service credentials
//!
//! The credential file is read once at startup. Two formats are accepted:
//! - a service-account key (`"type": "service_account"`), used to mint a
//!   short-lived OAuth bearer token
//! - `{ "api_key": "..." }`, sent as the `key` query parameter

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{SearchError, SearchResult};

/// OAuth scope for the vision API
pub const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";

/// Token endpoint used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for each signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialFile {
    ApiKey {
        api_key: String,
    },
    ServiceAccount {
        #[serde(rename = "type")]
        key_type: String,
        client_email: String,
        private_key: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
}

/// Loaded credentials
#[derive(Debug, Clone)]
pub enum Credentials {
    ApiKey(String),
    ServiceAccount(ServiceAccount),
}

impl Credentials {
    /// Read and validate a credential file
    pub fn from_file(path: &Path) -> SearchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Credentials(format!("Read {} failed: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse credential JSON
    pub fn from_json(content: &str) -> SearchResult<Self> {
        let file: CredentialFile = serde_json::from_str(content).map_err(|_| {
            SearchError::Credentials(
                "expected a service-account key or an object with \"api_key\"".to_string(),
            )
        })?;

        match file {
            CredentialFile::ApiKey { api_key } => {
                if api_key.trim().is_empty() {
                    return Err(SearchError::Credentials("api_key is empty".to_string()));
                }
                Ok(Credentials::ApiKey(api_key))
            }
            CredentialFile::ServiceAccount {
                key_type,
                client_email,
                private_key,
                token_uri,
            } => {
                if key_type != "service_account" {
                    return Err(SearchError::Credentials(format!(
                        "unsupported credential type: {}",
                        key_type
                    )));
                }
                let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
                    SearchError::Credentials(format!("invalid private_key: {}", e))
                })?;
                Ok(Credentials::ServiceAccount(ServiceAccount {
                    client_email,
                    token_uri: token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
                    key,
                }))
            }
        }
    }
}

/// Service-account identity and signing key
#[derive(Clone)]
pub struct ServiceAccount {
    pub client_email: String,
    pub token_uri: String,
    key: EncodingKey,
}

// Keeps the private key out of logs
impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl ServiceAccount {
    /// Signed RS256 JWT to exchange at `token_uri` for an access token
    pub fn signed_assertion(&self, issued_at: i64) -> SearchResult<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: VISION_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| SearchError::Credentials(format!("failed to sign assertion: {}", e)))
    }
}
