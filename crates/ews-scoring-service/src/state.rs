//! Shared application state for the scoring service's axum handlers and bus consumer.

use std::sync::Arc;

use ews_bus::EventBus;
use ews_consensus::ScoreConsensusEngine;
use ews_store::{EventStore, ReadModelProjector, ReadModelStore};
use ews_support::HealthState;

/// Handle passed into every request handler via axum's `State` extractor, and
/// into the background bus-consumer task.
#[derive(Clone)]
pub struct AppState {
    /// C3: reconciles per-node `ScoreEvent`s into a `ScoreConsensus`.
    pub score_consensus: Arc<ScoreConsensusEngine>,
    /// C5 write side: append-only event log.
    pub event_store: Arc<dyn EventStore>,
    /// C5 read side: projects consensus records onto the patient read model.
    pub projector: Arc<ReadModelProjector<Arc<dyn ReadModelStore>>>,
    /// C5 read side, used directly by query handlers that don't project.
    pub read_store: Arc<dyn ReadModelStore>,
    /// C6: consumes `ews.calculated`, publishes `ews.consensus`.
    pub bus: Arc<dyn EventBus>,
    pub health: HealthState,
}
