//! Process configuration for warehouse entry points.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The storage location is a single connection string.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_URL_VAR: &str = "WAREHOUSE_DATABASE_URL";
pub const LOG_LEVEL_VAR: &str = "WAREHOUSE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "WAREHOUSE_LOG_DIR";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://warehouse.db";

const MEMORY_ALIASES: &[&str] = &[
    ":memory:",
    "sqlite::memory:",
    "sqlite://:memory:",
    "sqlite:///:memory:",
];

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Value present but unusable for the given key.
    InvalidValue { key: &'static str, value: String },
    /// Connection string names an engine other than SQLite.
    UnsupportedScheme(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
            Self::UnsupportedScheme(scheme) => {
                write!(f, "unsupported storage scheme `{scheme}`; expected sqlite")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where a session stores its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// Private in-memory database, discarded when the session closes.
    Memory,
    /// Database file on disk.
    File(PathBuf),
}

impl StorageTarget {
    /// Parses a connection string.
    ///
    /// Accepts `sqlite::memory:`/`:memory:` style aliases, `sqlite:///path`,
    /// `sqlite://path`, `sqlite:path` and bare filesystem paths.
    pub fn parse(connection_string: &str) -> Result<Self, ConfigError> {
        let trimmed = connection_string.trim();
        if MEMORY_ALIASES.contains(&trimmed) {
            return Ok(Self::Memory);
        }

        let path = if let Some(rest) = trimmed.strip_prefix("sqlite:///") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("sqlite:") {
            rest
        } else if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        } else {
            trimmed
        };

        if path.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: DATABASE_URL_VAR,
                value: connection_string.to_string(),
            });
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Warehouse process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Storage connection string.
    pub database_url: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when absent.
    pub log_dir: Option<PathBuf>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl WarehouseConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. The connection string is parsed
    /// eagerly so a bad value fails at startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            database_url: read(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
            log_level: read(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        };
        config.storage()?;
        Ok(config)
    }

    /// Parsed storage target for `database_url`.
    pub fn storage(&self) -> Result<StorageTarget, ConfigError> {
        StorageTarget::parse(&self.database_url)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StorageTarget, WarehouseConfig, DATABASE_URL_VAR, LOG_DIR_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_recognizes_memory_aliases() {
        for alias in [
            ":memory:",
            "sqlite::memory:",
            "sqlite:///:memory:",
            " sqlite://:memory: ",
        ] {
            assert_eq!(StorageTarget::parse(alias).unwrap(), StorageTarget::Memory);
        }
    }

    #[test]
    fn parse_strips_sqlite_prefixes() {
        assert_eq!(
            StorageTarget::parse("sqlite:///warehouse.db").unwrap(),
            StorageTarget::File(PathBuf::from("warehouse.db"))
        );
        assert_eq!(
            StorageTarget::parse("sqlite:////var/lib/warehouse.db").unwrap(),
            StorageTarget::File(PathBuf::from("/var/lib/warehouse.db"))
        );
        assert_eq!(
            StorageTarget::parse("sqlite://data/wh.db").unwrap(),
            StorageTarget::File(PathBuf::from("data/wh.db"))
        );
        assert_eq!(
            StorageTarget::parse("plain.sqlite3").unwrap(),
            StorageTarget::File(PathBuf::from("plain.sqlite3"))
        );
    }

    #[test]
    fn parse_rejects_other_engines_and_empty_paths() {
        assert_eq!(
            StorageTarget::parse("postgres://localhost/warehouse").unwrap_err(),
            ConfigError::UnsupportedScheme("postgres".to_string())
        );
        assert!(matches!(
            StorageTarget::parse("sqlite://").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert!(StorageTarget::parse("").is_err());
    }

    #[test]
    fn from_lookup_applies_defaults_for_missing_or_blank_values() {
        let config = WarehouseConfig::from_lookup(lookup_from(&[(LOG_DIR_VAR, "  ")])).unwrap();
        assert_eq!(config, WarehouseConfig::default());
        assert_eq!(
            config.storage().unwrap(),
            StorageTarget::File(PathBuf::from("warehouse.db"))
        );
    }

    #[test]
    fn from_lookup_rejects_bad_connection_string() {
        let err = WarehouseConfig::from_lookup(lookup_from(&[(
            DATABASE_URL_VAR,
            "mysql://root@localhost/wh",
        )]))
        .unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedScheme("mysql".to_string()));
    }

    #[test]
    fn config_serializes_with_field_names() {
        let config = WarehouseConfig {
            database_url: "sqlite::memory:".to_string(),
            log_level: "warn".to_string(),
            log_dir: Some(PathBuf::from("/tmp/wh-logs")),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["database_url"], "sqlite::memory:");
        assert_eq!(json["log_level"], "warn");
        assert_eq!(json["log_dir"], "/tmp/wh-logs");
    }
}
