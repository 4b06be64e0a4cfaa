//! Shared application state for the ingestion service's axum handlers.

use std::sync::Arc;

use ews_bus::EventBus;
use ews_consensus::{CompletenessDetector, SensorConsensusEngine};
use ews_support::HealthState;

use crate::store::SensorConsensusStore;

/// Handle passed into every request handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// C2: per-`(patient, sensorType)` fan-in consensus.
    pub sensor_consensus: Arc<SensorConsensusEngine>,
    /// C4: tracks the latest valid consensus per sensor type and assembles
    /// complete vital vectors.
    pub completeness: Arc<CompletenessDetector>,
    /// Queryable history of persisted sensor consensus records, backing
    /// `GET /api/data/patient/{patientId}`.
    pub consensus_history: Arc<SensorConsensusStore>,
    /// C6: carries `ews.calculated` events to the scoring service.
    pub bus: Arc<dyn EventBus>,
    /// This process's identity, stamped onto every `ScoreEvent` it emits.
    pub node_id: String,
    pub health: HealthState,
}
