//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! `main` loads an optional `.env` file first.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use almacen_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// SQLite database file (`DATABASE_PATH`), or the PostgreSQL URL
    /// (`DATABASE_URL`) when built with the `postgres` feature
    pub database: String,

    /// Pool size
    pub db_max_connections: u32,

    /// How long a writer waits for the database lock, in milliseconds
    pub db_busy_timeout_ms: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))?,

            database: database_from_env()?,

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            db_busy_timeout_ms: env::var("DB_BUSY_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_BUSY_TIMEOUT_MS".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.database.trim().is_empty() {
            return Err(ConfigError::MissingRequired(DATABASE_VAR.to_string()));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.clone())
            .max_connections(self.db_max_connections)
            .busy_timeout(Duration::from_millis(self.db_busy_timeout_ms))
    }
}

#[cfg(not(feature = "postgres"))]
const DATABASE_VAR: &str = "DATABASE_PATH";

#[cfg(feature = "postgres")]
const DATABASE_VAR: &str = "DATABASE_URL";

/// SQLite falls back to `./data/almacen.db`; PostgreSQL has no default.
#[cfg(not(feature = "postgres"))]
fn database_from_env() -> Result<String, ConfigError> {
    Ok(env::var(DATABASE_VAR).unwrap_or_else(|_| "./data/almacen.db".to_string()))
}

#[cfg(feature = "postgres")]
fn database_from_env() -> Result<String, ConfigError> {
    env::var(DATABASE_VAR).map_err(|_| ConfigError::MissingRequired(DATABASE_VAR.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_and_db_config() {
        let config = ApiConfig {
            http_port: 8080,
            bind_addr: "127.0.0.1".parse().unwrap(),
            database: "./data/test.db".to_string(),
            db_max_connections: 3,
            db_busy_timeout_ms: 250,
        };

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:8080");

        let db = config.db_config();
        assert_eq!(db.max_connections, 3);
        assert_eq!(db.busy_timeout, Duration::from_millis(250));
        assert_eq!(db.database, "./data/test.db");
    }
}
