//! Configuration for wk10-review

use serde::Deserialize;
use std::path::PathBuf;
use wk10_common::config::{LoggingConfig, ServerArgs};

/// Default listen port
pub const DEFAULT_PORT: u16 = 5002;
pub const DEFAULT_MODEL_PATH: &str = "pkl_objects/model.json";

/// Command-line arguments for wk10-review
#[derive(clap::Parser, Debug, Default)]
#[command(name = "wk10-review")]
#[command(about = "Movie review classifier")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Model artifact (JSON)
    #[arg(long, env = "WK10_MODEL_PATH")]
    pub model_path: Option<PathBuf>,
}

/// `wk10-review.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub logging: LoggingConfig,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    pub bind_address: String,
    pub model_path: PathBuf,
}

impl ReviewSettings {
    /// Merge CLI/ENV arguments over the TOML file
    pub fn resolve(args: &Args, toml: &ReviewToml) -> Self {
        Self {
            bind_address: args
                .server
                .bind_address(toml.host.as_deref(), toml.port, DEFAULT_PORT),
            model_path: args
                .model_path
                .clone()
                .or_else(|| toml.model_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
        }
    }
}
