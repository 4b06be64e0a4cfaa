//! Ingestion service configuration.
//!
//! ## Environment variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EWS__HTTP__ADDR` | HTTP listen address | `127.0.0.1:8081` |
//! | `EWS__LOGGING__LEVEL` / `EWS__LOGGING__FORMAT` | see `ews_support::config` | `info` / `json` |
//! | `EWS__NODE_ID` | This process's identity when it scores a vital vector | `ingestion-1` |
//! | `EWS__BUS__USE_BROKER` | `true` to connect to AMQP, `false` for the in-memory bus | `false` |
//! | `EWS__BUS__AMQP_URL` | AMQP connection string, required when `USE_BROKER=true` | `amqp://127.0.0.1:5672/%2f` |

use ews_support::{HttpConfig, LoggingConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration for the ingestion service binary.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct IngestionConfig {
    #[validate(nested)]
    pub http: HttpConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
    /// Identity this process uses as `nodeId` on the `ScoreEvent`s it emits.
    #[validate(length(min = 1))]
    pub node_id: String,
    #[validate(nested)]
    pub bus: BusConfig,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                addr: "127.0.0.1:8081".parse().expect("valid default address"),
            },
            logging: LoggingConfig::default(),
            node_id: "ingestion-1".to_string(),
            bus: BusConfig::default(),
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
