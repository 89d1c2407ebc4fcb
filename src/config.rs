//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (explicit, must exist)
//! 2. `~/.huginn/config.toml` (user)
//! 3. built-in defaults
//!
//! The default cache directory can be moved with `HUGINN_CACHE_DIR`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::mirror::HubEndpoint;
use crate::mirror::endpoint::{DEFAULT_API_BASE, DEFAULT_RESOLVE_BASE};
use crate::mirror::planner::DEFAULT_BUNDLE_SUFFIXES;
use crate::transfer::RetryConfig;
use crate::transport::TransportConfig;
use crate::{HuginnError, Result};

/// Environment variable overriding the default cache directory.
pub const CACHE_DIR_ENV: &str = "HUGINN_CACHE_DIR";

/// Mirror configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuginnConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Local cache layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory repositories are mirrored into. `~` is expanded.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

/// Remote hub location and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_resolve_base")]
    pub resolve_base: String,
    /// Bearer token; takes precedence over `HF_TOKEN` and friends.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            resolve_base: default_resolve_base(),
            token: None,
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_resolve_base() -> String {
    DEFAULT_RESOLVE_BASE.to_string()
}

/// Retry and timeout settings for single-file transfers.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    /// Attempts per file, first one included (default: 4).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds (default: 1000).
    #[serde(default = "default_min_backoff_ms")]
    pub min_backoff_ms: u64,
    /// Upper bound on any retry delay in seconds (default: 60).
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_backoff_ms: default_min_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_max_attempts() -> u32 {
    4
}

fn default_min_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_secs() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    1800
}

/// Sync planning.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_bundle_suffixes")]
    pub bundle_suffixes: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            bundle_suffixes: default_bundle_suffixes(),
        }
    }
}

fn default_bundle_suffixes() -> Vec<String> {
    DEFAULT_BUNDLE_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

impl HuginnConfig {
    /// Load configuration from the standard locations, falling back to
    /// defaults when no file exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(dirs::home_dir()
            .map(|home| home.join(".huginn").join("config.toml"))
            .filter(|path| path.exists()))
    }

    /// Cache base directory: configured value, else `HUGINN_CACHE_DIR`, else
    /// the platform cache directory.
    pub fn base_dir(&self) -> PathBuf {
        match &self.cache.base_dir {
            Some(dir) => expand_tilde(dir),
            None => default_base_dir(),
        }
    }

    pub fn endpoint(&self) -> HubEndpoint {
        HubEndpoint::new(&self.hub.api_base, &self.hub.resolve_base)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.transfer.max_attempts)
            .min_backoff(Duration::from_millis(self.transfer.min_backoff_ms))
            .max_backoff(Duration::from_secs(self.transfer.max_backoff_secs))
    }

    pub fn transport_config(&self) -> TransportConfig {
        let config = TransportConfig::new()
            .connect_timeout(Duration::from_secs(self.transfer.connect_timeout_secs))
            .request_timeout(Duration::from_secs(self.transfer.request_timeout_secs));
        match &self.hub.token {
            Some(token) if !token.trim().is_empty() => {
                config.token(Some(token.trim().to_string()))
            }
            _ => config,
        }
    }
}

/// `HUGINN_CACHE_DIR`, else `<platform cache dir>/huginn/models`.
pub fn default_base_dir() -> PathBuf {
    std::env::var(CACHE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("huginn")
                .join("models")
        })
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = HuginnConfig::from_toml_str("").unwrap();
        assert_eq!(config.hub.api_base, DEFAULT_API_BASE);
        assert_eq!(config.transfer.max_attempts, 4);
        assert_eq!(config.transfer.request_timeout_secs, 1800);
        assert_eq!(config.planner.bundle_suffixes, vec![".mlmodelc", ".mlpackage"]);
        assert!(config.cache.base_dir.is_none());
    }

    #[test]
    fn partial_sections() {
        let config = HuginnConfig::from_toml_str(
            r#"
            [cache]
            base_dir = "/var/cache/models"

            [hub]
            resolve_base = "http://mirror.local"
            token = "hf_abc"

            [transfer]
            max_attempts = 2
            min_backoff_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.base_dir(), PathBuf::from("/var/cache/models"));
        assert_eq!(config.hub.api_base, DEFAULT_API_BASE);
        assert_eq!(config.endpoint().resolve_base, "http://mirror.local");

        let retry = config.retry_config();
        assert_eq!(retry.max_attempts, 2);
        assert_eq!(retry.min_backoff, Duration::from_millis(250));
        assert_eq!(retry.max_backoff, Duration::from_secs(60));

        assert_eq!(config.transport_config().token.as_deref(), Some("hf_abc"));
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(HuginnConfig::from_toml_str("[transfer]\nmax_attempts = \"many\"").is_err());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = HuginnConfig::load(Some(Path::new("/nonexistent/huginn.toml")));
        assert!(matches!(result, Err(HuginnError::Configuration(_))));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[planner]\nbundle_suffixes = [\".bundle\"]\n").unwrap();

        let config = HuginnConfig::load(Some(&path)).unwrap();
        assert_eq!(config.planner.bundle_suffixes, vec![".bundle"]);
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/models")), home.join("models"));
        }
        assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
