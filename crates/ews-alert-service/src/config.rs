//! Alert service configuration.
//!
//! ## Environment variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EWS__HTTP__ADDR` | HTTP listen address | `127.0.0.1:8083` |
//! | `EWS__LOGGING__LEVEL` / `EWS__LOGGING__FORMAT` | see `ews_support::config` | `info` / `json` |
//! | `EWS__BUS__USE_BROKER` / `EWS__BUS__AMQP_URL` | event-bus connection | `false` / `amqp://127.0.0.1:5672/%2f` |
//! | `EWS__SMTP__RELAY` / `USERNAME` / `PASSWORD` / `FROM` | email channel, ignored unless `EWS__SMTP__ENABLED=true` | disabled |

use ews_support::{HttpConfig, LoggingConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration for the alert service binary.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AlertConfig {
    #[validate(nested)]
    pub http: HttpConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub bus: BusConfig,
    #[validate(nested)]
    pub smtp: SmtpConfig,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                addr: "127.0.0.1:8083".parse().expect("valid default address"),
            },
            logging: LoggingConfig::default(),
            bus: BusConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

/// Event-bus connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct BusConfig {
    pub use_broker: bool,
    pub amqp_url: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            use_broker: false,
            amqp_url: "amqp://127.0.0.1:5672/%2f".to_string(),
        }
    }
}

/// SMTP relay settings for the email delivery channel. Disabled by default;
/// when disabled, `EmailChannel` is not constructed and email notifications
/// fail fast with "no adapter registered" rather than silently dropping.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SmtpConfig {
    pub enabled: bool,
    #[serde(default)]
    pub relay: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub from: String,
}
