//! NEWS2 score events, score-consensus records, and the patient read model
//! (spec §3, owned by C5; consumed by C1/C3/C7).

use crate::sensor::ConsensusMethod;
use crate::vitals::VitalSigns;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Categorical clinical-risk banding (spec Glossary): 0=Low, 1-4=Low-Medium, 5-6=Medium, >=7=High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClinicalRisk {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    High,
}

impl ClinicalRisk {
    /// Classify a total NEWS2 score (0-20) into a risk band.
    pub fn from_total_score(total: u8) -> Self {
        match total {
            0 => ClinicalRisk::Low,
            1..=4 => ClinicalRisk::LowMedium,
            5..=6 => ClinicalRisk::Medium,
            _ => ClinicalRisk::High,
        }
    }
}

/// Per-vital component scores, each in 0-3 (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub respiratory_rate: u8,
    pub oxygen_saturation: u8,
    pub temperature: u8,
    pub systolic_bp: u8,
    pub heart_rate: u8,
    pub consciousness: u8,
}

impl ScoreComponents {
    /// Sum of all six components (0-20).
    pub fn total(&self) -> u8 {
        self.respiratory_rate
            + self.oxygen_saturation
            + self.temperature
            + self.systolic_bp
            + self.heart_rate
            + self.consciousness
    }
}

/// The kind of per-node calculation a [`ScoreEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreEventKind {
    EwsCalculated,
    EwsUpdated,
    EwsValidated,
}

/// An immutable, append-only record of one per-node NEWS2 calculation.
/// Created by C5 on receipt from C1; never mutated; never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    pub event_id: Uuid,
    pub patient_id: String,
    pub node_id: String,
    pub kind: ScoreEventKind,
    pub observed_at: DateTime<Utc>,
    pub vital_signs: VitalSigns,
    pub score_components: ScoreComponents,
    pub total_score: u8,
    pub clinical_risk: ClinicalRisk,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A reconciliation record over multiple [`ScoreEvent`]s for one patient within a short window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreConsensus {
    pub consensus_id: Uuid,
    pub patient_id: String,
    /// The participating `ScoreEvent` subset (spec §3).
    pub node_scores: Vec<ScoreEvent>,
    pub consensus_score: u8,
    pub clinical_risk: ClinicalRisk,
    pub consensus_at: DateTime<Utc>,
    pub valid: bool,
    pub method: ConsensusMethod,
}

impl ScoreConsensus {
    /// The authoritative-vitals rule of spec §4.4: the participating event whose
    /// `totalScore` equals `consensusScore`, falling back to the earliest (by
    /// `observedAt`) participant when none matches exactly (e.g. `method = average`).
    pub fn authoritative_event(&self) -> Option<&ScoreEvent> {
        self.node_scores
            .iter()
            .find(|e| e.total_score == self.consensus_score)
            .or_else(|| {
                self.node_scores
                    .iter()
                    .min_by_key(|e| e.observed_at)
            })
    }
}

/// One entry in a patient's bounded score history ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub score: u8,
    pub clinical_risk: ClinicalRisk,
}

/// Maximum number of entries retained in [`PatientReadModel::score_history`] (spec §3).
pub const SCORE_HISTORY_CAPACITY: usize = 100;

/// CQRS projection over `ScoreConsensus` events — the authoritative per-patient current view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientReadModel {
    pub patient_id: String,
    pub current_score: u8,
    pub clinical_risk: ClinicalRisk,
    pub vital_signs: Option<VitalSigns>,
    pub score_components: Option<ScoreComponents>,
    pub score_history: VecDeque<ScoreHistoryEntry>,
    pub last_updated: DateTime<Utc>,
    /// Id of the last `ScoreConsensus` applied — the idempotence key (spec §4.5).
    pub last_consensus_id: Option<Uuid>,
}

impl PatientReadModel {
    /// A fresh projection for a patient that has never had a consensus applied.
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            current_score: 0,
            clinical_risk: ClinicalRisk::Low,
            vital_signs: None,
            score_components: None,
            score_history: VecDeque::new(),
            last_updated: DateTime::<Utc>::MIN_UTC,
            last_consensus_id: None,
        }
    }

    /// Push a history entry and truncate to [`SCORE_HISTORY_CAPACITY`] (ring, oldest dropped first).
    pub fn push_history(&mut self, entry: ScoreHistoryEntry) {
        self.score_history.push_back(entry);
        while self.score_history.len() > SCORE_HISTORY_CAPACITY {
            self.score_history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clinical_risk_bands_match_glossary() {
        assert_eq!(ClinicalRisk::from_total_score(0), ClinicalRisk::Low);
        assert_eq!(ClinicalRisk::from_total_score(1), ClinicalRisk::LowMedium);
        assert_eq!(ClinicalRisk::from_total_score(4), ClinicalRisk::LowMedium);
        assert_eq!(ClinicalRisk::from_total_score(5), ClinicalRisk::Medium);
        assert_eq!(ClinicalRisk::from_total_score(6), ClinicalRisk::Medium);
        assert_eq!(ClinicalRisk::from_total_score(7), ClinicalRisk::High);
        assert_eq!(ClinicalRisk::from_total_score(20), ClinicalRisk::High);
    }

    #[test]
    fn history_ring_truncates_to_capacity() {
        let mut model = PatientReadModel::new("p1");
        for i in 0..(SCORE_HISTORY_CAPACITY + 10) {
            model.push_history(ScoreHistoryEntry {
                timestamp: Utc::now(),
                score: (i % 20) as u8,
                clinical_risk: ClinicalRisk::Low,
            });
        }
        assert_eq!(model.score_history.len(), SCORE_HISTORY_CAPACITY);
    }
}
