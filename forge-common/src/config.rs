//! Configuration loading and resolution
//!
//! Settings resolve with CLI → environment → TOML file → compiled
//! default priority. A missing or unparsable TOML file degrades to the
//! compiled defaults with a warning; it never terminates startup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Backend the hosted product falls back to when nothing is configured
pub const DEFAULT_API_BASE_URL: &str =
    "https://campaign-backend-production-e2db.up.railway.app";

/// Default debounce between an edit and its validation pass
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default per-call analysis timeout
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter ("trace" through "error")
    pub level: String,
    /// Optional log file path (stderr when absent)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// On-disk TOML configuration schema
///
/// All fields optional: absent keys fall through to environment
/// variables and compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Backend API base URL
    pub api_base_url: Option<String>,
    /// Bearer token for backend calls
    pub api_token: Option<String>,
    /// Validation debounce in milliseconds
    pub debounce_ms: Option<u64>,
    /// Per-call analysis timeout in seconds
    pub analysis_timeout_secs: Option<u64>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub debounce: Duration,
    pub analysis_timeout: Duration,
    pub logging: LoggingConfig,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            analysis_timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
            logging: LoggingConfig::default(),
        }
    }
}

impl IntakeConfig {
    /// Resolve configuration from all sources
    ///
    /// Priority per key: CLI argument → environment variable → TOML
    /// file at the default path → compiled default.
    pub fn resolve(cli_base_url: Option<&str>) -> Self {
        let toml = default_config_path()
            .filter(|p| p.exists())
            .and_then(|p| match load_toml_config(&p) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warn!("Config file ignored ({}), using defaults", e);
                    None
                }
            });
        Self::resolve_from(cli_base_url, toml.as_ref())
    }

    /// Resolution core, separated so tests can inject a TOML config
    pub fn resolve_from(cli_base_url: Option<&str>, toml: Option<&TomlConfig>) -> Self {
        let defaults = Self::default();

        let api_base_url = cli_base_url
            .map(str::to_string)
            .or_else(|| env_nonempty("FORGE_API_BASE_URL"))
            .or_else(|| toml.and_then(|t| t.api_base_url.clone()))
            .unwrap_or(defaults.api_base_url);

        let api_token = env_nonempty("FORGE_API_TOKEN")
            .or_else(|| toml.and_then(|t| t.api_token.clone()))
            .filter(|t| !t.trim().is_empty());

        let debounce_ms = env_parsed::<u64>("FORGE_DEBOUNCE_MS")
            .or_else(|| toml.and_then(|t| t.debounce_ms))
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        let analysis_timeout_secs = env_parsed::<u64>("FORGE_ANALYSIS_TIMEOUT_SECS")
            .or_else(|| toml.and_then(|t| t.analysis_timeout_secs))
            .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT_SECS);

        let logging = toml.map(|t| t.logging.clone()).unwrap_or_default();

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_token,
            debounce: Duration::from_millis(debounce_ms),
            analysis_timeout: Duration::from_secs(analysis_timeout_secs),
            logging,
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring unparsable {}={:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}

/// Default configuration file path for the platform
///
/// `~/.config/campaignforge/intake.toml` on Linux, the platform
/// equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("campaignforge").join("intake.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Write a TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
