//! Shared configuration building blocks and the loader all three binaries use.
//!
//! ## Environment variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EWS__HTTP__ADDR` | HTTP listen address | `127.0.0.1:8080` |
//! | `EWS__LOGGING__LEVEL` | Log level | `info` |
//! | `EWS__LOGGING__FORMAT` | Log format (`json`/`pretty`) | `json` |
//!
//! Each service's own config struct embeds [`HttpConfig`] and [`LoggingConfig`]
//! alongside its service-specific sections (MongoDB URI, broker URI, SMTP
//! relay, and so on) and is loaded with [`load`].

use std::net::SocketAddr;

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;

/// HTTP server bind settings, embedded in every service config.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct HttpConfig {
    /// Listen address for the service's axum router.
    pub addr: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".parse().expect("valid default address"),
        }
    }
}

/// Logging settings, embedded in every service config.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoggingConfig {
    /// `trace`/`debug`/`info`/`warn`/`error`.
    #[validate(custom(function = "validate_log_level"))]
    pub level: String,
    /// `json` (production) or `pretty` (local development).
    #[validate(custom(function = "validate_log_format"))]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

fn validate_log_level(level: &str) -> Result<(), validator::ValidationError> {
    const VALID: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if VALID.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_log_level"))
    }
}

fn validate_log_format(format: &str) -> Result<(), validator::ValidationError> {
    const VALID: [&str; 2] = ["json", "pretty"];
    if VALID.contains(&format.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_log_format"))
    }
}

/// Load and validate a service configuration `T` from (in ascending priority)
/// its struct defaults, an optional YAML file at `file_path`, and `EWS__`-prefixed
/// environment variables (double-underscore separated, e.g. `EWS__HTTP__ADDR`).
pub fn load<T>(file_path: Option<&str>) -> Result<T, ConfigError>
where
    T: Default + Serialize + DeserializeOwned + Validate,
{
    let defaults = config::Config::try_from(&T::default())?;

    let mut builder = Config::builder().add_source(defaults);
    if let Some(path) = file_path {
        builder = builder.add_source(File::with_name(path).required(false));
    }
    builder = builder.add_source(
        Environment::with_prefix("EWS")
            .separator("__")
            .try_parsing(true),
    );

    let config: T = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
