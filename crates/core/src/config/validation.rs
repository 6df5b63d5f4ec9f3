//! Configuration validation rules.
//!
//! Validation runs after figment extraction, against the merged values.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - either TTL is not positive
    /// - pagination bounds are zero or inconsistent
    /// - `key_prefix` is empty
    /// - `bind_addr` is not a parseable socket address
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.values_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                field: "values_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.default_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "default_limit".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_limit < self.default_limit {
            return Err(ConfigError::Invalid {
                field: "max_limit".into(),
                reason: "must be at least default_limit".into(),
            });
        }
        if self.export_max_rows == 0 {
            return Err(ConfigError::Invalid {
                field: "export_max_rows".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.key_prefix.is_empty() {
            return Err(ConfigError::Invalid { field: "key_prefix".into(), reason: "must not be empty".into() });
        }

        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "bind_addr".into(),
                reason: format!("not a socket address: {}", self.bind_addr),
            });
        }

        if !self.cache_enabled {
            tracing::warn!("look-aside cache disabled; every request will hit the database");
        }

        Ok(())
    }
}
