//! Background task draining `ews.consensus` off the event bus and raising
//! alerts from it via the C7/C8 pipeline.

use ews_bus::ROUTING_KEY_EWS_CONSENSUS;
use futures_util::StreamExt;

use crate::pipeline::process_consensus;
use crate::state::AppState;

/// Subscribe to `ews.consensus` and process messages until the bus stream ends.
pub async fn run(state: AppState) {
    let mut stream = match state
        .bus
        .subscribe("ews-alert-service", ROUTING_KEY_EWS_CONSENSUS)
        .await
    {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "failed to subscribe to ews.consensus, consumer task exiting");
            return;
        }
    };

    while let Some(message) = stream.next().await {
        let consensus = match serde_json::from_value::<ews_types::ScoreConsensus>(message.payload) {
            Ok(consensus) => consensus,
            Err(err) => {
                tracing::warn!(error = %err, envelope_id = %message.envelope_id, "dropping malformed ews.consensus message");
                continue;
            }
        };

        process_consensus(&state, consensus).await;
    }

    tracing::warn!("ews.consensus consumer stream ended");
}
