//! # EWS Store
//!
//! The event store and CQRS read-model projector (C5): an append-only log of
//! per-node score events and their consensus records, plus the current
//! [`ews_types::PatientReadModel`] projection kept up to date from it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod mongo;
mod projector;
mod traits;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use mongo::{MongoConfig, MongoStore};
pub use projector::ReadModelProjector;
pub use traits::{EventQuery, EventStore, ReadModelStore};
