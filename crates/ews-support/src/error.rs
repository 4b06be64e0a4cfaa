//! Configuration-loading errors, shared by all three service binaries.

use thiserror::Error;

/// Errors raised while loading or validating a service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `config` crate failed to merge sources or deserialize the result.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `validator` rejected the deserialized configuration.
    #[error("configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
