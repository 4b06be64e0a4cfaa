//! The [`EventBus`] abstraction (spec §4.6): publish onto a routing key,
//! subscribe a durable queue bound to one.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::envelope::BusMessage;
use crate::error::Result;

/// Adapter over the `ews_events` topic exchange.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a JSON payload under `routing_key` (spec §4.6: `ews.calculated` / `ews.consensus`).
    async fn publish(&self, routing_key: &str, payload: serde_json::Value) -> Result<()>;

    /// Declare (if absent) a durable queue bound to `routing_key` and return a
    /// stream of messages delivered to it.
    async fn subscribe(
        &self,
        queue_name: &str,
        routing_key: &str,
    ) -> Result<BoxStream<'static, BusMessage>>;
}
