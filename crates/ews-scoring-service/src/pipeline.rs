//! The C3 -> C5 -> publish pipeline shared by the HTTP command handlers and
//! the bus-consumer task: both ultimately hand a [`ScoreEvent`] to this
//! function.

use ews_bus::ROUTING_KEY_EWS_CONSENSUS;
use ews_types::{ApiError, ApiResult, ScoreEvent};

use crate::state::AppState;

/// Reconcile one per-node `ScoreEvent` into consensus, persist both, project
/// the read model, and publish `ews.consensus` for the alert service.
pub async fn process_score_event(state: &AppState, event: ScoreEvent) -> ApiResult<ews_types::ScoreConsensus> {
    state
        .event_store
        .append_score_event(&event)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    let consensus = state.score_consensus.ingest_score_event(event);

    state
        .event_store
        .append_consensus(&consensus)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    state
        .projector
        .apply(&consensus)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    let payload = serde_json::to_value(&consensus)
        .map_err(|e| ApiError::Validation(format!("failed to serialize score consensus: {e}")))?;
    state
        .bus
        .publish(ROUTING_KEY_EWS_CONSENSUS, payload)
        .await
        .map_err(|e| ApiError::Bus(e.to_string()))?;

    ews_support::METRICS.record_consensus("score", &format!("{:?}", consensus.method));
    if consensus.clinical_risk == ews_types::ClinicalRisk::High
        || consensus.clinical_risk == ews_types::ClinicalRisk::Medium
    {
        ews_support::METRICS.high_risk_patients.set(
            state
                .read_store
                .high_risk_patients(None)
                .await
                .map(|v| v.len() as i64)
                .unwrap_or(0),
        );
    }

    tracing::info!(
        patient_id = %consensus.patient_id,
        consensus_score = consensus.consensus_score,
        clinical_risk = ?consensus.clinical_risk,
        valid = consensus.valid,
        "score consensus published"
    );

    Ok(consensus)
}
