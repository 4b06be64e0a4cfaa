//! C3: Event-Sourced Score Consensus Engine.
//!
//! Structurally identical to [`crate::sensor_consensus`] (spec §4.4 reuses the
//! §4.2 algorithm with different parameters): integer `totalScore` grouping
//! instead of exact-value grouping, and an absolute tolerance instead of a
//! relative one.

use std::collections::HashMap;

use chrono::Duration;
use ews_types::{ClinicalRisk, ConsensusMethod, ScoreConsensus, ScoreEvent};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::quorum::{self, Participant, Tolerance};

const WINDOW_BEFORE: i64 = 30;
const WINDOW_AFTER: i64 = 5;
const AGREEMENT_WINDOW_SECS: i64 = 5;
/// Absolute score-point tolerance for the average fallback (spec §4.4: `scoreThreshold = 1`).
const SCORE_TOLERANCE: f64 = 1.0;

#[derive(Default)]
struct Bucket {
    events: Vec<ScoreEvent>,
}

/// In-memory consensus engine over per-node NEWS2 score events for one patient.
#[derive(Default)]
pub struct ScoreConsensusEngine {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl ScoreConsensusEngine {
    /// A fresh engine with no retained state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one per-node score event and compute the [`ScoreConsensus`] it triggers.
    ///
    /// The persisted `consensusScore` is always an integer: for `average`/`none`
    /// outcomes the raw mean is rounded to the nearest whole point, while
    /// validity itself is decided on the unrounded mean against
    /// [`SCORE_TOLERANCE`] (spec §4.4, §9).
    pub fn ingest_score_event(&self, event: ScoreEvent) -> ScoreConsensus {
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(event.patient_id.clone()).or_default();

        bucket.events.push(event.clone());

        let lower = event.observed_at - Duration::seconds(WINDOW_BEFORE);
        let upper = event.observed_at + Duration::seconds(WINDOW_AFTER);
        bucket.events.retain(|e| e.observed_at >= lower);

        let windowed: Vec<&ScoreEvent> = bucket
            .events
            .iter()
            .filter(|e| e.observed_at >= lower && e.observed_at <= upper)
            .collect();

        let participants = latest_per_node(&windowed);
        let node_scores: Vec<ScoreEvent> = windowed
            .iter()
            .map(|e| (*e).clone())
            .filter(|e| participants.iter().any(|p| p.node_id == e.node_id && p.observed_at == e.observed_at))
            .collect();

        let outcome = quorum::reduce(
            participants,
            Duration::seconds(AGREEMENT_WINDOW_SECS),
            Tolerance::Absolute(SCORE_TOLERANCE),
        )
        .expect("the triggering event is always a participant");

        let consensus_score = outcome.value.round() as u8;

        ScoreConsensus {
            consensus_id: Uuid::new_v4(),
            patient_id: event.patient_id,
            node_scores,
            consensus_score,
            clinical_risk: ClinicalRisk::from_total_score(consensus_score),
            consensus_at: outcome.timestamp,
            valid: outcome.valid,
            method: outcome.method,
        }
    }
}

fn latest_per_node(events: &[&ScoreEvent]) -> Vec<Participant> {
    let mut by_node: HashMap<&str, &ScoreEvent> = HashMap::new();
    for e in events {
        by_node
            .entry(e.node_id.as_str())
            .and_modify(|existing| {
                if e.observed_at > existing.observed_at {
                    *existing = e;
                }
            })
            .or_insert(e);
    }
    by_node
        .into_values()
        .map(|e| Participant {
            node_id: e.node_id.clone(),
            value: e.total_score as f64,
            observed_at: e.observed_at,
        })
        .collect()
}
