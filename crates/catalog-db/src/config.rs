//! Environment-driven database configuration.
//!
//! Values are read from environment variables with fallback to defaults.
//!
//! | Variable                           | Default       |
//! |------------------------------------|---------------|
//! | `CATALOG_DB_PATH`                  | `products.db` |
//! | `CATALOG_DB_MAX_CONNECTIONS`       | `5`           |
//! | `CATALOG_DB_CONNECT_TIMEOUT_SECS`  | `30`          |

use std::env;
use std::time::Duration;

use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "CATALOG_DB_MAX_CONNECTIONS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "CATALOG_DB_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_DB_PATH: &str = "products.db";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

impl DbConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let mut config = DbConfig::new(path);

        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            let max: u32 = parse(ENV_MAX_CONNECTIONS, &raw)?;
            if max == 0 {
                return Err(invalid(ENV_MAX_CONNECTIONS, &raw));
            }
            config = config.max_connections(max);
        }

        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT_SECS) {
            let secs: u64 = parse(ENV_CONNECT_TIMEOUT_SECS, &raw)?;
            config = config.connect_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    }
}
