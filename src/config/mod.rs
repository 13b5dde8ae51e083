//! Service configuration.
//!
//! Read from `MEMBERSHIP__<SECTION>__<KEY>` environment variables, with a
//! `.env` file loaded first when one exists.
//!
//! # Example
//!
//! ```no_run
//! use membership_service::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Listener and membership store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Reads the configuration, e.g. `MEMBERSHIP__SERVER__PORT=8080` sets
    /// `server.port`.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` when no database section is present or a
    /// value does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBERSHIP")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
