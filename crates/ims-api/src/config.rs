//! Host configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `IMS_DB_PATH` | `<platform data dir>/inventory.db` |
//! | `IMS_MAX_CONNECTIONS` | `5` |
//! | `IMS_BUSY_TIMEOUT_SECS` | `5` |
//! | `IMS_RECENT_SALES_LIMIT` | `100` |
//! | `RUST_LOG` | `info,ims=debug,sqlx=warn` |

use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use ims_core::DEFAULT_RECENT_SALES_LIMIT;
use ims_db::{Database, DbConfig, DbError};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long a writer waits on the SQLite write lock
    pub busy_timeout: Duration,

    /// Default row cap for `list_sales`
    pub recent_sales_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: default_database_path(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            recent_sales_limit: DEFAULT_RECENT_SALES_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            db_path: lookup("IMS_DB_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            max_connections: parse_or(&lookup, "IMS_MAX_CONNECTIONS", defaults.max_connections)?,

            busy_timeout: Duration::from_secs(parse_or(
                &lookup,
                "IMS_BUSY_TIMEOUT_SECS",
                defaults.busy_timeout.as_secs(),
            )?),

            recent_sales_limit: parse_or(
                &lookup,
                "IMS_RECENT_SALES_LIMIT",
                defaults.recent_sales_limit,
            )?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("IMS_MAX_CONNECTIONS".to_string()));
        }
        if config.recent_sales_limit == 0 {
            return Err(ConfigError::InvalidValue("IMS_RECENT_SALES_LIMIT".to_string()));
        }

        Ok(config)
    }

    /// Pool settings for [`Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.max_connections)
            .busy_timeout(self.busy_timeout)
    }

    /// Creates the data directory if needed and opens the database.
    pub async fn connect(&self) -> Result<Database, DbError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        }

        Database::new(self.db_config()).await
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.smart-ims.ims/inventory.db`
/// - **Windows**: `%APPDATA%\smart-ims\ims\data\inventory.db`
/// - **Linux**: `~/.local/share/ims/inventory.db`
///
/// Falls back to `./inventory.db` when no home directory is known.
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "smart-ims", "ims")
        .map(|dirs| dirs.data_dir().join("inventory.db"))
        .unwrap_or_else(|| PathBuf::from("inventory.db"))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ims_db=trace` - Show trace for the store only
/// - Default: `info,ims=debug,sqlx=warn`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ims=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert_eq!(config.recent_sales_limit, 100);
        assert!(config.db_path.ends_with("inventory.db"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("IMS_DB_PATH", "/tmp/ims/test.db"),
            ("IMS_MAX_CONNECTIONS", "8"),
            ("IMS_BUSY_TIMEOUT_SECS", "2"),
            ("IMS_RECENT_SALES_LIMIT", " 25 "),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/ims/test.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.busy_timeout, Duration::from_secs(2));
        assert_eq!(config.recent_sales_limit, 25);

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.busy_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(lookup(&[("IMS_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "IMS_MAX_CONNECTIONS"));

        assert!(AppConfig::from_lookup(lookup(&[("IMS_MAX_CONNECTIONS", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("IMS_BUSY_TIMEOUT_SECS", "-1")])).is_err());
    }
}
