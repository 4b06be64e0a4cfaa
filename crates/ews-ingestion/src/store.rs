//! Append-only history of persisted [`SensorConsensus`] records, queried by
//! `GET /api/data/patient/{patientId}` (spec §6).
//!
//! Separate from [`ews_consensus::CompletenessDetector`], which only tracks
//! the single latest valid consensus per sensor type needed to decide when
//! to trigger NEWS2 scoring — this store keeps every record so the query API
//! can filter by time window and sensor type.

use chrono::{DateTime, Utc};
use ews_types::{SensorConsensus, SensorType};
use parking_lot::RwLock;

/// Filter applied by `GET /api/data/patient/{patientId}`.
#[derive(Debug, Clone, Default)]
pub struct SensorConsensusQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub sensor_type: Option<SensorType>,
}

/// A process-local, append-only log of sensor consensus records.
#[derive(Default)]
pub struct SensorConsensusStore {
    records: RwLock<Vec<SensorConsensus>>,
}

impl SensorConsensusStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly computed consensus record.
    pub fn record(&self, consensus: SensorConsensus) {
        self.records.write().push(consensus);
    }

    /// Query recorded consensus records for one patient, most recent first.
    pub fn query(&self, patient_id: &str, query: &SensorConsensusQuery) -> Vec<SensorConsensus> {
        let mut matched: Vec<SensorConsensus> = self
            .records
            .read()
            .iter()
            .filter(|c| c.patient_id == patient_id)
            .filter(|c| query.from.map_or(true, |from| c.consensus_at >= from))
            .filter(|c| query.to.map_or(true, |to| c.consensus_at <= to))
            .filter(|c| query.sensor_type.map_or(true, |t| c.sensor_type == t))
            .cloned()
            .collect();
        matched.sort_by_key(|c| std::cmp::Reverse(c.consensus_at));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ews_types::ConsensusMethod;

    fn consensus(patient_id: &str, sensor_type: SensorType, consensus_at: DateTime<Utc>) -> SensorConsensus {
        SensorConsensus {
            patient_id: patient_id.to_string(),
            sensor_type,
            participating: Vec::new(),
            consensus_value: 18.0,
            consensus_at,
            valid: true,
            method: ConsensusMethod::Single,
        }
    }

    #[test]
    fn queries_filter_by_patient_and_sensor_type() {
        let store = SensorConsensusStore::new();
        let now = Utc::now();
        store.record(consensus("p1", SensorType::RespRate, now));
        store.record(consensus("p1", SensorType::Spo2, now));
        store.record(consensus("p2", SensorType::RespRate, now));

        let result = store.query(
            "p1",
            &SensorConsensusQuery {
                from: None,
                to: None,
                sensor_type: Some(SensorType::RespRate),
            },
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sensor_type, SensorType::RespRate);
    }

    #[test]
    fn queries_filter_by_time_window() {
        let store = SensorConsensusStore::new();
        let now = Utc::now();
        store.record(consensus("p1", SensorType::RespRate, now - chrono::Duration::hours(2)));
        store.record(consensus("p1", SensorType::RespRate, now));

        let result = store.query(
            "p1",
            &SensorConsensusQuery {
                from: Some(now - chrono::Duration::minutes(5)),
                to: None,
                sensor_type: None,
            },
        );
        assert_eq!(result.len(), 1);
    }
}
