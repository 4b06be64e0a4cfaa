//! In-memory [`EventStore`]/[`ReadModelStore`] implementation, used in tests
//! and as the development-mode backend when no MongoDB is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use ews_types::{ClinicalRisk, PatientReadModel, ScoreConsensus, ScoreEvent};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::{EventQuery, EventStore, ReadModelStore};

/// A process-local store backed by `Vec`/`HashMap`. Not persisted across restarts.
#[derive(Default)]
pub struct InMemoryStore {
    events: RwLock<Vec<ScoreEvent>>,
    consensuses: RwLock<HashMap<Uuid, ScoreConsensus>>,
    read_models: RwLock<HashMap<String, PatientReadModel>>,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn append_score_event(&self, event: &ScoreEvent) -> Result<()> {
        self.events.write().push(event.clone());
        Ok(())
    }

    async fn append_consensus(&self, consensus: &ScoreConsensus) -> Result<()> {
        self.consensuses
            .write()
            .insert(consensus.consensus_id, consensus.clone());
        Ok(())
    }

    async fn get_consensus(&self, consensus_id: Uuid) -> Result<Option<ScoreConsensus>> {
        Ok(self.consensuses.read().get(&consensus_id).cloned())
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<ScoreEvent>> {
        let mut matched: Vec<ScoreEvent> = self
            .events
            .read()
            .iter()
            .filter(|e| {
                query
                    .patient_id
                    .as_ref()
                    .map_or(true, |p| &e.patient_id == p)
                    && query.since.map_or(true, |since| e.observed_at >= since)
            })
            .cloned()
            .collect();
        matched.sort_by_key(|e| std::cmp::Reverse(e.observed_at));
        if let Some(limit) = query.limit {
            matched.truncate(limit.max(0) as usize);
        }
        Ok(matched)
    }
}

#[async_trait]
impl ReadModelStore for InMemoryStore {
    async fn get(&self, patient_id: &str) -> Result<Option<PatientReadModel>> {
        Ok(self.read_models.read().get(patient_id).cloned())
    }

    async fn put(&self, model: &PatientReadModel) -> Result<()> {
        self.read_models
            .write()
            .insert(model.patient_id.clone(), model.clone());
        Ok(())
    }

    async fn high_risk_patients(&self, min_score: Option<u8>) -> Result<Vec<PatientReadModel>> {
        Ok(self
            .read_models
            .read()
            .values()
            .filter(|m| matches!(m.clinical_risk, ClinicalRisk::Medium | ClinicalRisk::High))
            .filter(|m| min_score.map_or(true, |min| m.current_score >= min))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_read_model() {
        let store = InMemoryStore::new();
        let model = PatientReadModel::new("p1");
        store.put(&model).await.unwrap();
        let fetched = store.get("p1").await.unwrap().unwrap();
        assert_eq!(fetched.patient_id, "p1");
    }

    #[tokio::test]
    async fn high_risk_patients_filters_by_clinical_risk() {
        let store = InMemoryStore::new();
        let mut low = PatientReadModel::new("low");
        low.clinical_risk = ClinicalRisk::Low;
        let mut high = PatientReadModel::new("high");
        high.clinical_risk = ClinicalRisk::High;
        store.put(&low).await.unwrap();
        store.put(&high).await.unwrap();

        let result = store.high_risk_patients(None).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].patient_id, "high");
    }

    #[tokio::test]
    async fn high_risk_patients_filters_by_min_score() {
        let store = InMemoryStore::new();
        let mut low_score = PatientReadModel::new("p1");
        low_score.clinical_risk = ClinicalRisk::Medium;
        low_score.current_score = 5;
        let mut high_score = PatientReadModel::new("p2");
        high_score.clinical_risk = ClinicalRisk::High;
        high_score.current_score = 9;
        store.put(&low_score).await.unwrap();
        store.put(&high_score).await.unwrap();

        let result = store.high_risk_patients(Some(7)).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].patient_id, "p2");
    }
}
