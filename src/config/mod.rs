//! # Marketplace Configuration
//!
//! Layered configuration for the marketplace core. Values are resolved in
//! this order, later layers winning:
//!
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. `config/swiggy.yaml`
//! 3. `config/swiggy.<environment>.yaml`
//! 4. `SWIGGY__`-prefixed environment variables (`SWIGGY__DATABASE__MAX_CONNECTIONS=20`)
//! 5. `DATABASE_URL`, which always overrides `database.url`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use swiggy_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let max_connections = manager.config().database.max_connections;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use crate::error::{SwiggyError, SwiggyResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/swiggy.yaml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

/// Which store backend serves the services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Connection string; required for the postgres backend
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Apply pending migrations when the marketplace starts
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            url: None,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 5,
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

/// Catalog seeding performed at startup and by `swiggy-admin seed`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub catalog_path: PathBuf,
    /// Skip seeding when restaurants already exist
    pub skip_if_populated: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            catalog_path: PathBuf::from("config/seed/restaurants.yaml"),
            skip_if_populated: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    /// Also write JSON lines to a file in `directory`
    pub json_file: bool,
    /// EnvFilter directive; the environment default applies when unset
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("log"),
            json_file: false,
            level: None,
        }
    }
}

impl AppConfig {
    /// Validate cross-field constraints that serde cannot express
    pub fn validate(&self) -> SwiggyResult<()> {
        let database = &self.database;

        if database.backend == StoreBackend::Postgres
            && database.url.as_deref().map_or(true, str::is_empty)
        {
            return Err(SwiggyError::Configuration(
                "database.url is required for the postgres backend (set DATABASE_URL)".to_string(),
            ));
        }

        if database.max_connections == 0 {
            return Err(SwiggyError::Configuration(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        if database.min_connections > database.max_connections {
            return Err(SwiggyError::Configuration(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                database.min_connections, database.max_connections
            )));
        }

        if self.seed.enabled && self.seed.catalog_path.as_os_str().is_empty() {
            return Err(SwiggyError::Configuration(
                "seed.catalog_path is required when seeding is enabled".to_string(),
            ));
        }

        Ok(())
    }

    /// Configuration for tests and local runs without PostgreSQL
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_require_database_url() {
        let config = AppConfig::default();
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert!(matches!(
            config.validate(),
            Err(SwiggyError::Configuration(_))
        ));
    }

    #[test]
    fn test_in_memory_config_is_valid() {
        assert!(AppConfig::in_memory().validate().is_ok());
    }

    #[test]
    fn test_pool_bounds_checked() {
        let mut config = AppConfig::in_memory();
        config.database.min_connections = 20;
        config.database.max_connections = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_connections"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
database:
  backend: memory
  max_connections: 4
logging:
  json_file: true
"#,
        )
        .unwrap();

        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(5));
        assert!(config.logging.json_file);
        assert!(config.seed.skip_if_populated);
    }
}
