//! Event-store and projection errors.

use thiserror::Error;

/// Errors raised by the event store and read-model projector (C5).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested patient, event, or consensus record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The MongoDB driver returned an error.
    #[error("backend error: {0}")]
    Backend(#[from] mongodb::error::Error),

    /// A document failed to (de)serialize to/from BSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
