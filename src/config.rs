//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ApiClientConfig, DEFAULT_BASE_URL};
use crate::dashboard::{DashboardConfig, ItemDefaults, ReconcilePolicy};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub dashboard: DashboardSection,

    #[serde(default)]
    pub catalog: ItemDefaults,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public storefront, used for item links in order listings
    #[serde(default = "default_storefront_url")]
    pub storefront_url: String,

    /// Unset means requests never time out
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_storefront_url() -> String {
    "https://roasterz.vercel.app".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            storefront_url: default_storefront_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Where durable local state lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("roasterz-admin").to_string_lossy().to_string())
        .unwrap_or_else(|| "./roasterz_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded
    pub fn data_dir(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Dashboard behaviour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardSection {
    #[serde(default)]
    pub reconcile: ReconcilePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// A config file that exists but cannot be read or parsed is an error
    /// rather than a silent fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("roasterz-admin").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file among `paths`, or defaults when none exists
    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Settings the dashboard controller needs
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            reconcile: self.dashboard.reconcile,
            item_defaults: self.catalog.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ROASTERZ_API_URL") {
            self.api.base_url = url;
        }
        if let Some(data_dir) = lookup("ROASTERZ_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(level) = lookup("ROASTERZ_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ROASTERZ_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Roasterz Admin Configuration
#
# Environment variables override these settings:
# - ROASTERZ_API_URL
# - ROASTERZ_DATA_DIR
# - ROASTERZ_LOG_LEVEL
# - ROASTERZ_LOG_FORMAT

[api]
# Backend base URL, including the /api prefix
base_url = "https://roasterz-backend.vercel.app/api"

# Storefront used for item links in order listings
storefront_url = "https://roasterz.vercel.app"

# Request timeout in seconds (unset = wait indefinitely)
# request_timeout_secs = 30

[storage]
# Directory holding the saved auth token
data_dir = "~/.local/share/roasterz-admin"

[dashboard]
# What to do after a successful create:
# optimistic - append the submitted values
# refetch    - append, then re-fetch the collection for server ids
reconcile = "optimistic"

[catalog]
# Initial values of the add-item form
price = "180"
quantity = "999"
discount = "50"
type = "Anime"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://roasterz-backend.vercel.app/api");
        assert!(config.api.request_timeout_secs.is_none());
        assert_eq!(config.dashboard.reconcile, ReconcilePolicy::Optimistic);
        assert_eq!(config.catalog, ItemDefaults::default());
    }

    #[test]
    fn test_generated_config_parses() {
        let mut config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.storefront_url, "https://roasterz.vercel.app");
        assert_eq!(config.catalog.kind, "Anime");
        assert_eq!(config.logging.format, "pretty");

        config.apply_overrides(|_| None);
        assert_eq!(config.storage.data_dir, "~/.local/share/roasterz-admin");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.storage.data_dir(),
                home.join(".local/share/roasterz-admin")
            );
        }
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "http://localhost:5000/api"
            request_timeout_secs = 10

            [dashboard]
            reconcile = "refetch"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.storefront_url, "https://roasterz.vercel.app");
        let client = config.api.client_config();
        assert_eq!(client.base_url, "http://localhost:5000/api");
        assert_eq!(client.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.dashboard_config().reconcile, ReconcilePolicy::Refetch);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("ROASTERZ_API_URL", "http://staging/api"),
            ("ROASTERZ_DATA_DIR", "/tmp/roasterz"),
            ("ROASTERZ_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://staging/api");
        assert_eq!(config.storage.data_dir(), PathBuf::from("/tmp/roasterz"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("config.toml");
        std::fs::write(&present, "[logging]\nformat = \"json\"\n").unwrap();

        let config = Config::load_first(&[missing.clone(), present]).unwrap();
        assert_eq!(config.logging.format, "json");

        let config = Config::load_first(&[missing]).unwrap();
        assert_eq!(config.api.storefront_url, "https://roasterz.vercel.app");
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        let fallback = dir.path().join("other.toml");
        std::fs::write(&broken, "[api\nbase_url = 1").unwrap();
        std::fs::write(&fallback, "").unwrap();

        let err = Config::load_first(&[broken, fallback]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
