//! The message envelope carried over the bus (spec §4.6).
//!
//! Every publish wraps its payload in an envelope carrying the originating
//! event's own id, so a consumer that sees the same `envelope_id` twice
//! (at-least-once delivery, broker redelivery after a crashed consumer) can
//! de-duplicate before handing the payload to a projector that is not itself
//! naturally idempotent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Routing key for newly calculated per-node NEWS2 score events.
pub const ROUTING_KEY_EWS_CALCULATED: &str = "ews.calculated";
/// Routing key for score-consensus records.
pub const ROUTING_KEY_EWS_CONSENSUS: &str = "ews.consensus";
/// The topic exchange all EWS services publish to and consume from.
pub const EXCHANGE_NAME: &str = "ews_events";

/// A message as it travels over the bus: routing metadata plus a JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusMessage {
    /// Id of the envelope itself — used for consumer-side de-duplication.
    pub envelope_id: Uuid,
    /// The AMQP routing key the message was published under.
    pub routing_key: String,
    /// When the publisher produced the envelope.
    pub published_at: DateTime<Utc>,
    /// The wrapped event, as JSON (a [`ews_types::ScoreEvent`] or
    /// [`ews_types::ScoreConsensus`], depending on `routing_key`).
    pub payload: serde_json::Value,
}

/// Field names carrying the wrapped event's own id, tried in order. Every
/// payload this bus carries ([`ews_types::ScoreEvent`], [`ews_types::ScoreConsensus`])
/// serializes its id under one of these camelCase keys.
const ID_FIELDS: &[&str] = &["eventId", "consensusId", "alertId"];

impl BusMessage {
    /// Wrap a serializable payload into an envelope keyed by the payload's own
    /// id, so redelivery of the same event produces the same `envelope_id`
    /// and consumers can de-duplicate on it.
    pub fn new(routing_key: impl Into<String>, payload: serde_json::Value) -> Self {
        let envelope_id = payload_id(&payload).unwrap_or_else(Uuid::new_v4);
        Self {
            envelope_id,
            routing_key: routing_key.into(),
            published_at: Utc::now(),
            payload,
        }
    }
}

fn payload_id(payload: &serde_json::Value) -> Option<Uuid> {
    ID_FIELDS.iter().find_map(|field| {
        payload
            .get(field)
            .and_then(serde_json::Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    })
}
