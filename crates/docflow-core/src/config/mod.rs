//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field has a default so an absent file is valid.

pub mod consistency;
pub mod extraction;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::consistency::ConsistencyConfig;
pub use self::extraction::ExtractionConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Content extraction limits.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Aggregate maintenance retry policy.
    #[serde(default)]
    pub consistency: ConsistencyConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the file at `path` (optional), an environment overlay at
    /// `config/{DOCFLOW_ENV}` (optional), and environment variables prefixed
    /// with `DOCFLOW__` (e.g. `DOCFLOW__CONSISTENCY__MAX_RETRIES=8`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Ok(env) = std::env::var("DOCFLOW_ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DOCFLOW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
