//! Background task draining `ews.calculated` off the event bus and driving
//! it through the same pipeline the HTTP command endpoints use — the
//! scoring service must react to events the ingestion service publishes,
//! not only to ones submitted directly against its own API.

use ews_bus::ROUTING_KEY_EWS_CALCULATED;
use futures_util::StreamExt;

use crate::pipeline::process_score_event;
use crate::state::AppState;

/// Subscribe to `ews.calculated` and process messages until the bus stream ends.
pub async fn run(state: AppState) {
    let mut stream = match state
        .bus
        .subscribe("ews-scoring-service", ROUTING_KEY_EWS_CALCULATED)
        .await
    {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "failed to subscribe to ews.calculated, consumer task exiting");
            return;
        }
    };

    while let Some(message) = stream.next().await {
        let event = match serde_json::from_value::<ews_types::ScoreEvent>(message.payload) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, envelope_id = %message.envelope_id, "dropping malformed ews.calculated message");
                continue;
            }
        };

        if let Err(err) = process_score_event(&state, event).await {
            tracing::error!(error = %err, "failed to process score event from bus");
        }
    }

    tracing::warn!("ews.calculated consumer stream ended");
}
