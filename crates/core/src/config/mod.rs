//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (GRIDVIEW_*)
//! 2. TOML config file (if GRIDVIEW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite account database.
    ///
    /// Set via GRIDVIEW_STORE_DB_PATH environment variable.
    #[serde(default = "default_store_db_path")]
    pub store_db_path: PathBuf,

    /// Path to the SQLite cache database.
    ///
    /// Set via GRIDVIEW_CACHE_DB_PATH environment variable.
    #[serde(default = "default_cache_db_path")]
    pub cache_db_path: PathBuf,

    /// Whether the look-aside cache is used at all.
    ///
    /// Set via GRIDVIEW_CACHE_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Time-to-live for cached grid responses, in seconds.
    ///
    /// Set via GRIDVIEW_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// Time-to-live for cached distinct-value lists, in seconds.
    /// Dropdown contents change rarely, so this is much longer.
    ///
    /// Set via GRIDVIEW_VALUES_TTL_SECS environment variable.
    #[serde(default = "default_values_ttl_secs")]
    pub values_ttl_secs: i64,

    /// Application namespace prepended to every cache key.
    ///
    /// Set via GRIDVIEW_KEY_PREFIX environment variable.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Socket address the HTTP server binds to.
    ///
    /// Set via GRIDVIEW_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Page size when the request doesn't specify one.
    #[serde(default = "default_default_limit")]
    pub default_limit: u32,

    /// Upper bound for the requested page size.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Row cap for CSV export.
    #[serde(default = "default_export_max_rows")]
    pub export_max_rows: u32,
}

fn default_store_db_path() -> PathBuf {
    PathBuf::from("./gridview-data.sqlite")
}

fn default_cache_db_path() -> PathBuf {
    PathBuf::from("./gridview-cache.sqlite")
}

fn default_cache_ttl_secs() -> i64 {
    300
}

fn default_values_ttl_secs() -> i64 {
    86_400
}

fn default_key_prefix() -> String {
    "gridview".into()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_default_limit() -> u32 {
    25
}

fn default_max_limit() -> u32 {
    500
}

fn default_export_max_rows() -> u32 {
    50_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_db_path: default_store_db_path(),
            cache_db_path: default_cache_db_path(),
            cache_enabled: true,
            cache_ttl_secs: default_cache_ttl_secs(),
            values_ttl_secs: default_values_ttl_secs(),
            key_prefix: default_key_prefix(),
            bind_addr: default_bind_addr(),
            default_limit: default_default_limit(),
            max_limit: default_max_limit(),
            export_max_rows: default_export_max_rows(),
        }
    }
}

impl AppConfig {
    /// Namespace for cached grid responses.
    pub fn data_namespace(&self) -> String {
        format!("{}:data:", self.key_prefix)
    }

    /// Namespace for cached distinct-value lists.
    pub fn values_namespace(&self) -> String {
        format!("{}:values:", self.key_prefix)
    }

    /// Prefix shared by every key this application writes.
    pub fn flush_prefix(&self) -> String {
        format!("{}:", self.key_prefix)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("GRIDVIEW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("GRIDVIEW_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_db_path, PathBuf::from("./gridview-data.sqlite"));
        assert_eq!(config.cache_db_path, PathBuf::from("./gridview-cache.sqlite"));
        assert!(config.cache_enabled);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.values_ttl_secs, 86_400);
        assert_eq!(config.key_prefix, "gridview");
        assert_eq!(config.default_limit, 25);
        assert_eq!(config.max_limit, 500);
    }

    #[test]
    fn test_namespaces() {
        let config = AppConfig::default();
        assert_eq!(config.data_namespace(), "gridview:data:");
        assert_eq!(config.values_namespace(), "gridview:values:");
        assert_eq!(config.flush_prefix(), "gridview:");
    }
}
