//! # EWS Bus
//!
//! The event bus adapter (C6): publishes score events and consensus records
//! onto the `ews_events` topic exchange and hands consumers a de-duplicable
//! envelope stream. [`InMemoryBus`] is a broker-free fallback for development
//! and tests; [`AmqpBus`] is the production adapter.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod amqp;
mod envelope;
mod error;
mod memory;
mod traits;

pub use amqp::AmqpBus;
pub use envelope::{BusMessage, EXCHANGE_NAME, ROUTING_KEY_EWS_CALCULATED, ROUTING_KEY_EWS_CONSENSUS};
pub use error::{BusError, Result};
pub use memory::InMemoryBus;
pub use traits::EventBus;
