//! An in-process [`EventBus`] fallback for development and tests, when no
//! broker is configured (spec §9: "process-wide event-bus singleton" — this
//! is the no-broker degenerate case of that same singleton).

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::envelope::BusMessage;
use crate::error::Result;
use crate::traits::EventBus;

const CHANNEL_CAPACITY: usize = 1024;

/// A broker-free [`EventBus`] backed by an in-process broadcast channel per routing key.
#[derive(Default)]
pub struct InMemoryBus {
    channels: RwLock<HashMap<String, broadcast::Sender<BusMessage>>>,
}

impl InMemoryBus {
    /// A fresh bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn sender_for(&self, routing_key: &str) -> broadcast::Sender<BusMessage> {
        if let Some(tx) = self.channels.read().get(routing_key) {
            return tx.clone();
        }
        let mut channels = self.channels.write();
        channels
            .entry(routing_key.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl EventBus for InMemoryBus {
    async fn publish(&self, routing_key: &str, payload: serde_json::Value) -> Result<()> {
        let envelope = BusMessage::new(routing_key, payload);
        let tx = self.sender_for(routing_key);
        // No subscribers yet is not an error — the sensor-ingestion service can
        // start publishing before the scoring service has subscribed.
        let _ = tx.send(envelope);
        debug!(routing_key, "published to in-memory bus");
        Ok(())
    }

    async fn subscribe(
        &self,
        _queue_name: &str,
        routing_key: &str,
    ) -> Result<BoxStream<'static, BusMessage>> {
        let rx = self.sender_for(routing_key).subscribe();
        let stream = BroadcastStream::new(rx).filter_map(|result| async move { result.ok() });
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ROUTING_KEY_EWS_CALCULATED;

    #[tokio::test]
    async fn subscriber_receives_published_message() {
        let bus = InMemoryBus::new();
        let mut stream = bus
            .subscribe("q1", ROUTING_KEY_EWS_CALCULATED)
            .await
            .unwrap();

        bus.publish(ROUTING_KEY_EWS_CALCULATED, serde_json::json!({"patientId": "p1"}))
            .await
            .unwrap();

        let message = stream.next().await.unwrap();
        assert_eq!(message.routing_key, ROUTING_KEY_EWS_CALCULATED);
        assert_eq!(message.payload["patientId"], "p1");
    }

    #[tokio::test]
    async fn messages_on_different_routing_keys_do_not_cross() {
        let bus = InMemoryBus::new();
        let mut consensus_stream = bus.subscribe("q1", "ews.consensus").await.unwrap();

        bus.publish(ROUTING_KEY_EWS_CALCULATED, serde_json::json!({}))
            .await
            .unwrap();

        let timeout = tokio::time::timeout(std::time::Duration::from_millis(50), consensus_stream.next()).await;
        assert!(timeout.is_err(), "consensus subscriber should not see a calculated-routing-key message");
    }
}
