//! Application configuration module
//!
//! Type-safe configuration loaded with the `config` and `dotenvy` crates.
//! Environment variables use the `PROTOCOL_ADHERENCE` prefix and `__` as the
//! nesting separator; an optional TOML file can supply the same keys.
//!
//! # Example
//!
//! ```no_run
//! use protocol_adherence::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod adherence;
mod database;
mod error;
mod server;

pub use adherence::AdherenceConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::path::Path;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Absent means in-memory stores.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub adherence: AdherenceConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and environment variables.
    ///
    /// - `PROTOCOL_ADHERENCE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PROTOCOL_ADHERENCE__DATABASE__URL=...` -> `database.url = ...`
    /// - `PROTOCOL_ADHERENCE__ADHERENCE__UTC_OFFSET_MINUTES=-180`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_file(None)
    }

    /// Like [`AppConfig::load`], layering environment variables over an
    /// optional configuration file.
    pub fn load_with_file(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("PROTOCOL_ADHERENCE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.adherence.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
