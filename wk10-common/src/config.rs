//! Configuration file loading, tracing setup and directory initialization
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Steps 1 and 2 come from `clap` ([`ServerArgs`] plus each app's own
//! flags); this module locates and parses the TOML file.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name under the platform config dir (`~/.config/wk10`)
pub const CONFIG_DIR_NAME: &str = "wk10";

/// Default bind host for every app
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Command-line options every app accepts
///
/// Flatten into an app's `clap` parser with `#[command(flatten)]`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ServerArgs {
    /// Host/IP to bind
    #[arg(long, env = "WK10_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WK10_PORT")]
    pub port: Option<u16>,

    /// Explicit TOML config file
    #[arg(short, long, env = "WK10_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServerArgs {
    /// Resolve `host:port` from CLI/ENV, then TOML, then defaults
    pub fn bind_address(
        &self,
        toml_host: Option<&str>,
        toml_port: Option<u16>,
        default_port: u16,
    ) -> String {
        let host = self
            .host
            .as_deref()
            .or(toml_host)
            .unwrap_or(DEFAULT_HOST);
        let port = self.port.or(toml_port).unwrap_or(default_port);
        format!("{}:{}", host, port)
    }
}

/// `[logging]` section shared by every app's TOML file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level)),
        )
        .init();
}

/// Default TOML locations for a module, most specific first
///
/// Linux: `~/.config/wk10/<module>.toml`, then `/etc/wk10/<module>.toml`
pub fn config_file_candidates(module_name: &str) -> Vec<PathBuf> {
    let file_name = format!("{}.toml", module_name);
    let mut candidates = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(CONFIG_DIR_NAME).join(&file_name));
    }

    if cfg!(unix) {
        candidates.push(PathBuf::from("/etc").join(CONFIG_DIR_NAME).join(&file_name));
    }

    candidates
}

/// Where a module's configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this TOML file
    File(PathBuf),
    /// No file found; compiled defaults in effect
    Defaults,
}

impl ConfigSource {
    /// Report the source; call once the tracing subscriber is installed
    pub fn log(&self, module_name: &str) {
        match self {
            ConfigSource::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigSource::Defaults => warn!(
                "No config file found for {} (using defaults)",
                module_name
            ),
        }
    }
}

/// A parsed TOML config and the file it was read from
#[derive(Debug)]
pub struct LoadedConfig<T> {
    pub config: T,
    pub source: ConfigSource,
}

/// Load a module's TOML config
///
/// An explicit path must exist. Without one, the default locations are
/// searched and a missing file degrades to `T::default()`.
/// A file that exists but fails to parse is always an error.
///
/// Runs before tracing is initialized (the file holds the log level), so
/// nothing is logged here; report `source` afterwards with [`ConfigSource::log`].
pub fn load_toml_config<T>(module_name: &str, explicit_path: Option<&Path>) -> Result<LoadedConfig<T>>
where
    T: DeserializeOwned + Default,
{
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return parse_toml_file(path);
    }

    match config_file_candidates(module_name)
        .into_iter()
        .find(|p| p.exists())
    {
        Some(path) => parse_toml_file(&path),
        None => Ok(LoadedConfig {
            config: T::default(),
            source: ConfigSource::Defaults,
        }),
    }
}

fn parse_toml_file<T: DeserializeOwned>(path: &Path) -> Result<LoadedConfig<T>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path.to_path_buf()),
    })
}

/// Create a directory (and parents) if missing
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created directory: {}", path.display());
    }
    Ok(())
}
