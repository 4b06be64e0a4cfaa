//! C2: Sensor-Value Consensus Engine.
//!
//! Maintains a short-lived, per-`(patientId, sensorType)` window of recent
//! readings in memory (spec §9 "Lazy consensus state": no store round-trip is
//! needed to decide consensus, only to persist the outcome) and reduces it to
//! a [`SensorConsensus`] on every new reading.

use std::collections::HashMap;

use chrono::Duration;
use ews_types::{ConsensusMethod, ParticipatingReading, SensorConsensus, SensorReading, SensorType};
use parking_lot::Mutex;

use crate::quorum::{self, Participant, Tolerance};

/// Readings older than this relative to the triggering reading's timestamp are
/// dropped from the window (spec §4.2: window lower bound is `observedAt - 30s`).
const WINDOW_BEFORE: i64 = 30;
/// Readings newer than this are still admitted (spec §4.2: upper bound `observedAt + 5s`,
/// covering readings that arrive slightly out of order).
const WINDOW_AFTER: i64 = 5;
/// Timestamp-agreement / majority-grouping threshold (spec §4.2).
const AGREEMENT_WINDOW_SECS: i64 = 5;
/// Relative tolerance for the average fallback (spec §4.2).
const RELATIVE_TOLERANCE: f64 = 0.20;

#[derive(Default)]
struct Bucket {
    readings: Vec<SensorReading>,
}

/// In-memory consensus engine for one process's worth of edge-node traffic.
///
/// Cheap to clone (an `Arc`-backed handle would be the usual wiring at the
/// service layer); internally synchronized so it can be shared across
/// concurrent request handlers.
#[derive(Default)]
pub struct SensorConsensusEngine {
    buckets: Mutex<HashMap<(String, SensorType), Bucket>>,
}

impl SensorConsensusEngine {
    /// A fresh engine with no retained state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one reading and compute the [`SensorConsensus`] it triggers.
    ///
    /// Always returns a consensus (spec §4.2 step 2: even a single observer is
    /// accepted, with `method = single`). Readings older than [`WINDOW_BEFORE`]
    /// seconds relative to this one are evicted from the bucket as a side effect.
    pub fn ingest_reading(&self, reading: SensorReading) -> SensorConsensus {
        let key = (reading.patient_id.clone(), reading.sensor_type);
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(key).or_default();

        bucket.readings.push(reading.clone());

        let lower = reading.observed_at - Duration::seconds(WINDOW_BEFORE);
        let upper = reading.observed_at + Duration::seconds(WINDOW_AFTER);
        bucket.readings.retain(|r| r.observed_at >= lower);

        let windowed: Vec<&SensorReading> = bucket
            .readings
            .iter()
            .filter(|r| r.observed_at >= lower && r.observed_at <= upper)
            .collect();

        let participants = latest_per_node(&windowed);

        let outcome = quorum::reduce(
            participants,
            Duration::seconds(AGREEMENT_WINDOW_SECS),
            Tolerance::Relative(RELATIVE_TOLERANCE),
        )
        .expect("the triggering reading is always a participant");

        SensorConsensus {
            patient_id: reading.patient_id,
            sensor_type: reading.sensor_type,
            participating: outcome
                .participants
                .iter()
                .map(|p| ParticipatingReading {
                    node_id: p.node_id.clone(),
                    value: p.value,
                    observed_at: p.observed_at,
                })
                .collect(),
            consensus_value: outcome.value,
            consensus_at: outcome.timestamp,
            valid: outcome.valid,
            method: outcome.method,
        }
    }
}

/// Keep only the most recent reading per node (spec §4.2 step 1).
fn latest_per_node(readings: &[&SensorReading]) -> Vec<Participant> {
    let mut by_node: HashMap<&str, &SensorReading> = HashMap::new();
    for r in readings {
        by_node
            .entry(r.node_id.as_str())
            .and_modify(|existing| {
                if r.observed_at > existing.observed_at {
                    *existing = r;
                }
            })
            .or_insert(r);
    }
    by_node
        .into_values()
        .map(|r| Participant {
            node_id: r.node_id.clone(),
            value: r.value,
            observed_at: r.observed_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(node: &str, value: f64, secs_offset: i64) -> SensorReading {
        SensorReading {
            patient_id: "p1".to_string(),
            sensor_type: SensorType::HeartRate,
            value,
            unit: "bpm".to_string(),
            observed_at: Utc::now() + Duration::seconds(secs_offset),
            node_id: node.to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn single_reading_is_accepted_as_single() {
        let engine = SensorConsensusEngine::new();
        let consensus = engine.ingest_reading(reading("n1", 72.0, 0));
        assert_eq!(consensus.method, ConsensusMethod::Single);
        assert!(consensus.valid);
        assert_eq!(consensus.participating.len(), 1);
    }

    /// Scenario S2: two nodes agree within the window -> majority.
    #[test]
    fn s2_two_nodes_agree_is_majority() {
        let engine = SensorConsensusEngine::new();
        engine.ingest_reading(reading("n1", 72.0, 0));
        let consensus = engine.ingest_reading(reading("n2", 72.0, 2));
        assert_eq!(consensus.method, ConsensusMethod::Majority);
        assert!(consensus.valid);
        assert_eq!(consensus.consensus_value, 72.0);
        assert_eq!(consensus.participating.len(), 2);
    }

    #[test]
    fn later_reading_from_same_node_replaces_earlier_one_in_window() {
        let engine = SensorConsensusEngine::new();
        engine.ingest_reading(reading("n1", 70.0, 0));
        let consensus = engine.ingest_reading(reading("n1", 75.0, 1));
        assert_eq!(consensus.participating.len(), 1);
        assert_eq!(consensus.consensus_value, 75.0);
    }

    #[test]
    fn readings_outside_window_are_evicted() {
        let engine = SensorConsensusEngine::new();
        engine.ingest_reading(reading("n1", 70.0, -40));
        let consensus = engine.ingest_reading(reading("n2", 80.0, 0));
        // n1's reading is more than WINDOW_BEFORE seconds stale relative to n2's.
        assert_eq!(consensus.method, ConsensusMethod::Single);
        assert_eq!(consensus.participating.len(), 1);
        assert_eq!(consensus.participating[0].node_id, "n2");
    }
}
