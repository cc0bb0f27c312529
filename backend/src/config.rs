//! Configuration management for the AyurChain dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with AYUR_ prefix

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Which batch source backs the dashboard
    pub data_source: DataSourceConfig,

    /// Database configuration, used when `data_source.kind = "database"`
    pub database: DatabaseConfig,

    /// Batch API configuration, used when `data_source.kind = "http"`
    pub batch_api: BatchApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceConfig {
    pub kind: DataSourceKind,
}

/// Batch data-access strategy, chosen once at start-up
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// Query the `herb_batches` table directly
    Database,
    /// Call the batch API service
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BatchApiConfig {
    /// Base URL of the batch API (without the `/api/batches` path)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AYUR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AYUR_ prefix)
            .add_source(
                Environment::with_prefix("AYUR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builder pre-populated with the default values
    pub fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data_source.kind", "http")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("batch_api.base_url", "http://localhost:3000")?
            .set_default("batch_api.timeout_secs", 10)
    }

    /// Reject combinations that cannot start a working server
    pub fn validate(&self) -> Result<(), AppError> {
        if self.data_source.kind == DataSourceKind::Database
            && self.database.url.as_deref().map_or(true, str::is_empty)
        {
            return Err(AppError::Configuration(
                "database.url is required when data_source.kind is \"database\"".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::Configuration(
                "database.min_connections cannot exceed database.max_connections".to_string(),
            ));
        }

        if self.batch_api.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "batch_api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
