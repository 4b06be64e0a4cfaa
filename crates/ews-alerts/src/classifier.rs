//! C7: classify a [`ScoreConsensus`] into an [`AlertType`]/[`AlertSeverity`]
//! pair and compute its priority (spec §4.7).

use ews_types::{AlertSeverity, AlertType, ClinicalRisk, ScoreConsensus};

/// Base priority contributed by severity, before the per-type addend (spec §4.7).
fn base_priority(severity: AlertSeverity) -> u8 {
    match severity {
        AlertSeverity::Low => 30,
        AlertSeverity::Medium => 50,
        AlertSeverity::High => 80,
    }
}

/// Addend contributed by alert type, layered on top of the severity base.
fn type_addend(alert_type: AlertType) -> i16 {
    match alert_type {
        AlertType::EwsCritical => 20,
        AlertType::SensorCritical => 18,
        AlertType::EwsUrgent => 15,
        AlertType::SensorWarning => 8,
        AlertType::EwsElevated => 10,
        AlertType::EwsDataInconsistency => 0,
    }
}

/// Classify a score consensus into an alert type and severity, per spec §4.7:
///
/// - `valid = false` -> `EWS_DATA_INCONSISTENCY` / `MEDIUM` (the consensus
///   itself is the anomaly, independent of the score it produced).
/// - otherwise, by clinical risk: `High` -> `EWS_CRITICAL`/`HIGH`,
///   `Medium` -> `EWS_URGENT`/`MEDIUM`, `Low-Medium` -> `EWS_ELEVATED`/`LOW`,
///   `Low` -> no alert.
pub fn classify(consensus: &ScoreConsensus) -> Option<(AlertType, AlertSeverity)> {
    if !consensus.valid {
        return Some((AlertType::EwsDataInconsistency, AlertSeverity::Medium));
    }
    match consensus.clinical_risk {
        ClinicalRisk::High => Some((AlertType::EwsCritical, AlertSeverity::High)),
        ClinicalRisk::Medium => Some((AlertType::EwsUrgent, AlertSeverity::Medium)),
        ClinicalRisk::LowMedium => Some((AlertType::EwsElevated, AlertSeverity::Low)),
        ClinicalRisk::Low => None,
    }
}

/// Compute the clamped 1-100 priority for an alert type/severity pair (spec
/// Testable property 10).
pub fn priority(alert_type: AlertType, severity: AlertSeverity) -> u8 {
    let raw = base_priority(severity) as i16 + type_addend(alert_type);
    raw.clamp(1, 100) as u8
}
