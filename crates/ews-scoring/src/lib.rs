//! # EWS Scoring
//!
//! The NEWS2 scorer (C1): a pure, deterministic function from a complete
//! [`VitalSigns`] vector to component scores, a total, and a clinical risk
//! band. No I/O, no time dependence beyond the value it is handed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod banding;
mod error;

pub use error::{Result, ScoringError};

use banding::{
    score_consciousness, score_heart_rate, score_oxygen_saturation, score_respiratory_rate,
    score_systolic_bp, score_temperature,
};
use ews_types::{ClinicalRisk, ScoreComponents, VitalSigns};

/// The result of scoring one [`VitalSigns`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ews2Score {
    /// Per-vital component scores (spec §4.1).
    pub components: ScoreComponents,
    /// Sum of all six components, 0-20.
    pub total_score: u8,
    /// Categorical risk derived from `total_score`.
    pub clinical_risk: ClinicalRisk,
}

/// Score a complete vital-sign vector against the NEWS2 banding table (spec §4.1).
///
/// Pure and idempotent (spec Testable property 1): calling this twice with the
/// same `vitals` always yields the same [`Ews2Score`].
pub fn score(vitals: &VitalSigns) -> Result<Ews2Score> {
    let components = ScoreComponents {
        respiratory_rate: score_respiratory_rate(vitals.respiratory_rate)?,
        oxygen_saturation: score_oxygen_saturation(vitals.oxygen_saturation)?,
        temperature: score_temperature(vitals.temperature)?,
        systolic_bp: score_systolic_bp(vitals.systolic_bp)?,
        heart_rate: score_heart_rate(vitals.heart_rate)?,
        consciousness: score_consciousness(vitals.consciousness),
    };
    let total_score = components.total();
    Ok(Ews2Score {
        components,
        total_score,
        clinical_risk: ClinicalRisk::from_total_score(total_score),
    })
}
