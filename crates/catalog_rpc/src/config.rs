//! Environment-driven configuration for catalog processes.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Logging stays uninitialized unless a log directory is configured.

use catalog_core::{default_log_level, init_logging, LoggingError};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CATALOG_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CATALOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CATALOG_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "catalog.sqlite3";

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// SQLite database file backing the catalog.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<String>,
}

impl RpcConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns whether logging was initialized.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match self.log_dir.as_deref() {
            Some(log_dir) => {
                init_logging(&self.log_level, log_dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RpcConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> RpcConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        RpcConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("catalog.sqlite3")
        );
        assert_eq!(config.log_level, catalog_core::default_log_level());
        assert_eq!(config.log_dir, None);
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = config_from(&[
            (DB_PATH_ENV, " /var/lib/catalog.db "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/catalog"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/catalog.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/catalog"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(DB_PATH_ENV, "   "), (LOG_DIR_ENV, "")]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("catalog.sqlite3")
        );
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn relative_log_dir_is_rejected_by_logging_init() {
        let config = config_from(&[(LOG_DIR_ENV, "logs")]);
        assert!(config.init_logging().is_err());
    }
}
