//! The read-model projector (C5): applies [`ScoreConsensus`] events onto the
//! per-patient [`PatientReadModel`] idempotently and under per-patient
//! serialization (spec §4.5, §5).

use std::collections::HashMap;
use std::sync::Arc;

use ews_types::{PatientReadModel, ScoreConsensus, ScoreHistoryEntry};
use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::ReadModelStore;

/// Projects [`ScoreConsensus`] events onto the read model, one patient's
/// updates serialized at a time regardless of how many consensus records
/// arrive concurrently (spec §5: "no interleaved read model writes for a
/// single patient").
pub struct ReadModelProjector<S: ReadModelStore> {
    store: S,
    locks: SyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<S: ReadModelStore> ReadModelProjector<S> {
    /// Wrap a [`ReadModelStore`] backend with projection logic.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: SyncMutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, patient_id: &str) -> Arc<AsyncMutex<()>> {
        self.locks
            .lock()
            .entry(patient_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Apply a consensus record to the patient's read model.
    ///
    /// Idempotent: if `consensus.consensus_id` matches the model's
    /// `last_consensus_id`, the call is a no-op (spec §4.5 — the event bus
    /// does not guarantee exactly-once delivery).
    pub async fn apply(&self, consensus: &ScoreConsensus) -> Result<PatientReadModel> {
        let lock = self.lock_for(&consensus.patient_id);
        let _guard = lock.lock().await;

        let mut model = self
            .store
            .get(&consensus.patient_id)
            .await?
            .unwrap_or_else(|| PatientReadModel::new(consensus.patient_id.clone()));

        if model.last_consensus_id == Some(consensus.consensus_id) {
            debug!(patient_id = %consensus.patient_id, consensus_id = %consensus.consensus_id, "duplicate consensus, skipping projection");
            return Ok(model);
        }

        model.current_score = consensus.consensus_score;
        model.clinical_risk = consensus.clinical_risk;
        model.last_updated = consensus.consensus_at;
        model.last_consensus_id = Some(consensus.consensus_id);

        if consensus.valid {
            if let Some(authoritative) = consensus.authoritative_event() {
                model.vital_signs = Some(authoritative.vital_signs);
                model.score_components = Some(authoritative.score_components);
            }
        }

        model.push_history(ScoreHistoryEntry {
            timestamp: consensus.consensus_at,
            score: consensus.consensus_score,
            clinical_risk: consensus.clinical_risk,
        });

        self.store.put(&model).await?;
        info!(patient_id = %model.patient_id, score = model.current_score, "projected score consensus");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use ews_types::{ClinicalRisk, ConsensusMethod, ScoreComponents, ScoreEvent, ScoreEventKind, VitalSigns};
    use uuid::Uuid;

    fn consensus(patient_id: &str, consensus_id: Uuid, score: u8) -> ScoreConsensus {
        let event = ScoreEvent {
            event_id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            node_id: "n1".to_string(),
            kind: ScoreEventKind::EwsCalculated,
            observed_at: chrono::Utc::now(),
            vital_signs: VitalSigns {
                respiratory_rate: 18.0,
                oxygen_saturation: 96.0,
                temperature: 37.0,
                systolic_bp: 120.0,
                heart_rate: 72.0,
                consciousness: ews_types::Consciousness::Alert,
            },
            score_components: ScoreComponents {
                respiratory_rate: 0,
                oxygen_saturation: 0,
                temperature: 0,
                systolic_bp: 0,
                heart_rate: 0,
                consciousness: 0,
            },
            total_score: score,
            clinical_risk: ClinicalRisk::from_total_score(score),
            metadata: serde_json::Value::Null,
        };
        ScoreConsensus {
            consensus_id,
            patient_id: patient_id.to_string(),
            node_scores: vec![event],
            consensus_score: score,
            clinical_risk: ClinicalRisk::from_total_score(score),
            consensus_at: chrono::Utc::now(),
            valid: true,
            method: ConsensusMethod::Single,
        }
    }

    #[tokio::test]
    async fn applies_consensus_and_updates_history() {
        let projector = ReadModelProjector::new(InMemoryStore::new());
        let model = projector.apply(&consensus("p1", Uuid::new_v4(), 5)).await.unwrap();
        assert_eq!(model.current_score, 5);
        assert_eq!(model.score_history.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_consensus_id_is_a_no_op() {
        let projector = ReadModelProjector::new(InMemoryStore::new());
        let id = Uuid::new_v4();
        projector.apply(&consensus("p1", id, 5)).await.unwrap();
        let model = projector.apply(&consensus("p1", id, 9)).await.unwrap();
        // Second apply carries the same consensus_id, so the score-9 update never lands.
        assert_eq!(model.current_score, 5);
        assert_eq!(model.score_history.len(), 1);
    }

    #[tokio::test]
    async fn invalid_consensus_updates_score_but_preserves_prior_vitals() {
        let projector = ReadModelProjector::new(InMemoryStore::new());
        let first = consensus("p1", Uuid::new_v4(), 5);
        let model = projector.apply(&first).await.unwrap();
        let prior_vitals = model.vital_signs;
        assert!(prior_vitals.is_some());

        let mut second = consensus("p1", Uuid::new_v4(), 6);
        second.valid = false;
        second.method = ConsensusMethod::None;
        let model = projector.apply(&second).await.unwrap();

        assert_eq!(model.current_score, 6);
        assert_eq!(model.score_history.len(), 2);
        assert_eq!(model.vital_signs, prior_vitals);
    }
}
