//! Storage-backend traits for the event store and read model (spec §4.5).
//!
//! Mirrors the pluggable-backend shape the rest of the workspace uses
//! elsewhere: a narrow trait per concern, `Send + Sync` so handles can be
//! shared behind an `Arc` across request handlers.

use async_trait::async_trait;
use ews_types::{PatientReadModel, ScoreConsensus, ScoreEvent};

use crate::error::Result;

/// A filter over the append-only event log, used by the query-side API
/// (spec §6: `GET /api/query/events`).
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Restrict to one patient.
    pub patient_id: Option<String>,
    /// Only events observed at or after this time.
    pub since: Option<chrono::DateTime<chrono::Utc>>,
    /// Maximum number of events to return, most recent first.
    pub limit: Option<i64>,
}

/// Append-only store for per-node score events and their consensus records.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one immutable per-node score event (spec §4.5: never mutated, never deleted).
    async fn append_score_event(&self, event: &ScoreEvent) -> Result<()>;

    /// Append a consensus record.
    async fn append_consensus(&self, consensus: &ScoreConsensus) -> Result<()>;

    /// Fetch a consensus record by id.
    async fn get_consensus(&self, consensus_id: uuid::Uuid) -> Result<Option<ScoreConsensus>>;

    /// Query raw score events (spec §6 query API).
    async fn query_events(&self, query: &EventQuery) -> Result<Vec<ScoreEvent>>;
}

/// The CQRS read side: one current [`PatientReadModel`] per patient.
#[async_trait]
pub trait ReadModelStore: Send + Sync {
    /// Fetch the current read model for a patient, if one exists.
    async fn get(&self, patient_id: &str) -> Result<Option<PatientReadModel>>;

    /// Replace the stored read model for a patient.
    async fn put(&self, model: &PatientReadModel) -> Result<()>;

    /// All patients whose current clinical risk is `Medium` or `High` and,
    /// when given, whose `currentScore` is at least `min_score` (spec §6:
    /// `GET /api/query/high-risk-patients?minScore=5`).
    async fn high_risk_patients(&self, min_score: Option<u8>) -> Result<Vec<PatientReadModel>>;
}

/// Lets a boxed backend be used directly as a [`ReadModelStore`], so
/// `ReadModelProjector<std::sync::Arc<dyn ReadModelStore>>` can be chosen at
/// startup between [`crate::InMemoryStore`] and [`crate::MongoStore`] without
/// the projector itself being generic over the concrete backend.
#[async_trait]
impl ReadModelStore for std::sync::Arc<dyn ReadModelStore> {
    async fn get(&self, patient_id: &str) -> Result<Option<PatientReadModel>> {
        (**self).get(patient_id).await
    }

    async fn put(&self, model: &PatientReadModel) -> Result<()> {
        (**self).put(model).await
    }

    async fn high_risk_patients(&self, min_score: Option<u8>) -> Result<Vec<PatientReadModel>> {
        (**self).high_risk_patients(min_score).await
    }
}
