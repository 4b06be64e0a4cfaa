//! Scoring service configuration.
//!
//! ## Environment variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EWS__HTTP__ADDR` | HTTP listen address | `127.0.0.1:8082` |
//! | `EWS__LOGGING__LEVEL` / `EWS__LOGGING__FORMAT` | see `ews_support::config` | `info` / `json` |
//! | `EWS__BUS__USE_BROKER` / `EWS__BUS__AMQP_URL` | event-bus connection | `false` / `amqp://127.0.0.1:5672/%2f` |
//! | `EWS__STORE__USE_MONGO` | `true` to persist to MongoDB, `false` for the in-memory store | `false` |
//! | `EWS__STORE__MONGO_URI` | MongoDB connection string, required when `USE_MONGO=true` | `mongodb://127.0.0.1:27017` |
//! | `EWS__STORE__MONGO_DATABASE` | MongoDB database name | `ews` |

use ews_support::{HttpConfig, LoggingConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration for the scoring service binary.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScoringConfig {
    #[validate(nested)]
    pub http: HttpConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub bus: BusConfig,
    #[validate(nested)]
    pub store: StoreConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                addr: "127.0.0.1:8082".parse().expect("valid default address"),
            },
            logging: LoggingConfig::default(),
            bus: BusConfig::default(),
            store: StoreConfig::default(),
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

/// Document-store connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct StoreConfig {
    pub use_mongo: bool,
    pub mongo_uri: String,
    pub mongo_database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_mongo: false,
            mongo_uri: "mongodb://127.0.0.1:27017".to_string(),
            mongo_database: "ews".to_string(),
        }
    }
}
