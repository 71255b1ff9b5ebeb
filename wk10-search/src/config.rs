//! Configuration for wk10-search
//!
//! Every setting resolves CLI → ENV → TOML → compiled default. The
//! credential path additionally honors `GOOGLE_APPLICATION_CREDENTIALS`
//! after `WK10_CREDENTIALS`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use wk10_common::config::{LoggingConfig, ServerArgs};

use crate::services::vision_client::DEFAULT_VISION_ENDPOINT;
use crate::services::VisionConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5001;
/// Uploads land here so they can be served back on the results page
pub const DEFAULT_UPLOAD_FOLDER: &str = "static/tmp";
pub const DEFAULT_CREDENTIALS_PATH: &str = "key.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Fallback variable read by the upstream client libraries
pub const GOOGLE_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Command-line arguments for wk10-search
#[derive(clap::Parser, Debug, Default)]
#[command(name = "wk10-search")]
#[command(about = "Image search front end for the vision web-detection API")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Directory for uploaded images
    #[arg(long, env = "WK10_UPLOAD_FOLDER")]
    pub upload_folder: Option<PathBuf>,

    /// Vision credential file (service-account key or {"api_key": ...})
    #[arg(long, env = "WK10_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Vision API endpoint (scheme + host)
    #[arg(long, env = "WK10_VISION_ENDPOINT")]
    pub vision_endpoint: Option<String>,

    /// Timeout for each vision request, in seconds
    #[arg(long, env = "WK10_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Largest accepted upload body, in bytes
    #[arg(long, env = "WK10_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Cap on entities/images returned by web detection
    #[arg(long, env = "WK10_MAX_RESULTS")]
    pub max_results: Option<u32>,
}

/// `wk10-search.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_folder: Option<PathBuf>,
    pub credentials_path: Option<PathBuf>,
    pub vision_endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub max_results: Option<u32>,
    pub logging: LoggingConfig,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub bind_address: String,
    pub upload_folder: PathBuf,
    pub credentials_path: PathBuf,
    pub vision_endpoint: String,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub max_results: Option<u32>,
}

impl SearchSettings {
    /// Merge CLI/ENV arguments over the TOML file
    pub fn resolve(args: &Args, toml: &SearchToml) -> Self {
        let credentials_path = args
            .credentials
            .clone()
            .or_else(|| std::env::var_os(GOOGLE_CREDENTIALS_ENV).map(PathBuf::from))
            .or_else(|| toml.credentials_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

        let timeout_secs = args
            .request_timeout_secs
            .or(toml.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            bind_address: args
                .server
                .bind_address(toml.host.as_deref(), toml.port, DEFAULT_PORT),
            upload_folder: args
                .upload_folder
                .clone()
                .or_else(|| toml.upload_folder.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_FOLDER)),
            credentials_path,
            vision_endpoint: args
                .vision_endpoint
                .clone()
                .or_else(|| toml.vision_endpoint.clone())
                .unwrap_or_else(|| DEFAULT_VISION_ENDPOINT.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: args
                .max_upload_bytes
                .or(toml.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            max_results: args.max_results.or(toml.max_results),
        }
    }

    /// Vision client settings derived from these
    pub fn vision_config(&self) -> VisionConfig {
        VisionConfig {
            endpoint: self.vision_endpoint.clone(),
            timeout: self.request_timeout,
            max_results: self.max_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "WK10_HOST",
            "WK10_PORT",
            "WK10_CONFIG",
            "WK10_UPLOAD_FOLDER",
            "WK10_CREDENTIALS",
            "WK10_VISION_ENDPOINT",
            "WK10_REQUEST_TIMEOUT_SECS",
            "WK10_MAX_UPLOAD_BYTES",
            "WK10_MAX_RESULTS",
            GOOGLE_CREDENTIALS_ENV,
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let args = Args::parse_from(["wk10-search"]);
        let settings = SearchSettings::resolve(&args, &SearchToml::default());

        assert_eq!(settings.bind_address, "127.0.0.1:5001");
        assert_eq!(settings.upload_folder, PathBuf::from("static/tmp"));
        assert_eq!(settings.credentials_path, PathBuf::from("key.json"));
        assert_eq!(settings.vision_endpoint, DEFAULT_VISION_ENDPOINT);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.max_results, None);
    }

    #[test]
    #[serial]
    fn test_cli_overrides_toml() {
        clear_env();
        let args = Args::parse_from([
            "wk10-search",
            "--port",
            "7001",
            "--upload-folder",
            "/srv/uploads",
            "--request-timeout-secs",
            "5",
        ]);
        let toml = SearchToml {
            port: Some(6001),
            upload_folder: Some(PathBuf::from("/var/uploads")),
            max_results: Some(20),
            ..Default::default()
        };
        let settings = SearchSettings::resolve(&args, &toml);

        assert_eq!(settings.bind_address, "127.0.0.1:7001");
        assert_eq!(settings.upload_folder, PathBuf::from("/srv/uploads"));
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.max_results, Some(20));
        assert_eq!(settings.vision_config().max_results, Some(20));
    }

    #[test]
    #[serial]
    fn test_credentials_priority() {
        clear_env();
        let toml = SearchToml {
            credentials_path: Some(PathBuf::from("/etc/wk10/toml-key.json")),
            ..Default::default()
        };

        let args = Args::parse_from(["wk10-search"]);
        assert_eq!(
            SearchSettings::resolve(&args, &toml).credentials_path,
            PathBuf::from("/etc/wk10/toml-key.json")
        );

        std::env::set_var(GOOGLE_CREDENTIALS_ENV, "/google/key.json");
        assert_eq!(
            SearchSettings::resolve(&args, &toml).credentials_path,
            PathBuf::from("/google/key.json")
        );

        std::env::set_var("WK10_CREDENTIALS", "/wk10/key.json");
        let args = Args::parse_from(["wk10-search"]);
        assert_eq!(
            SearchSettings::resolve(&args, &toml).credentials_path,
            PathBuf::from("/wk10/key.json")
        );

        clear_env();
    }
}
