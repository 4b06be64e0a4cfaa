//! Event-bus adapter errors.

use thiserror::Error;

/// Errors raised publishing to or consuming from the event bus (C6).
#[derive(Debug, Error)]
pub enum BusError {
    /// The AMQP broker connection or channel failed.
    #[error("broker error: {0}")]
    Broker(#[from] lapin::Error),

    /// A payload failed to serialize or deserialize to/from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
