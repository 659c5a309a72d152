//! API server configuration.
//!
//! ## Layering (later wins)
//! ```text
//! built-in defaults
//!      │
//!      ▼
//! cashier.toml  (or the file named by CASHIER_CONFIG; optional)
//!      │
//!      ▼
//! CASHIER__SECTION__KEY environment variables
//!      e.g. CASHIER__SERVER__PORT=9000
//!           CASHIER__DATABASE__PATH=/var/lib/cashier/cashier.db
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use cashier_db::DbConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cashier.toml";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,cashier=debug,sqlx=warn";

/// API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, or `:memory:`.
    pub path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl AppConfig {
    /// Loads configuration from `CASHIER_CONFIG` (or `cashier.toml`) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("CASHIER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_with(&path, Environment::with_prefix("CASHIER"))
    }

    /// Loads configuration from an explicit file and environment source.
    pub fn load_with(path: &str, environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "cashier.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.busy_timeout_secs", 5)?
            .set_default("log.filter", DEFAULT_LOG_FILTER)?
            .add_source(File::with_name(path).required(false))
            .add_source(environment.separator("__").try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("server.port must not be 0".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "database.min_connections must not exceed database.max_connections".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Database pool settings.
    pub fn db_config(&self) -> DbConfig {
        let db = &self.database;
        let base = if db.path.as_os_str() == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&db.path)
                .max_connections(db.max_connections)
                .min_connections(db.min_connections)
        };
        base.acquire_timeout(Duration::from_secs(db.acquire_timeout_secs))
            .busy_timeout(Duration::from_secs(db.busy_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}
