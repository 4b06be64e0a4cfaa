//! The derived, non-persisted vital-sign view consumed by the NEWS2 scorer (spec §3, C4).

use crate::sensor::Consciousness;
use serde::{Deserialize, Serialize};

/// A complete six-vital snapshot, ready to be scored by C1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    pub respiratory_rate: f64,
    pub oxygen_saturation: f64,
    pub temperature: f64,
    pub systolic_bp: f64,
    pub heart_rate: f64,
    pub consciousness: Consciousness,
}

/// Accumulator used while C4 is deciding whether a complete vector exists.
///
/// Each field is populated independently as fresh, valid per-sensor consensus
/// arrives; [`VitalSignsBuilder::complete`] converts to [`VitalSigns`] only once
/// all six are present.
#[derive(Debug, Clone, Default)]
pub struct VitalSignsBuilder {
    pub respiratory_rate: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub temperature: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub heart_rate: Option<f64>,
    pub consciousness: Option<Consciousness>,
}

impl VitalSignsBuilder {
    /// True iff all six vitals are present.
    pub fn is_complete(&self) -> bool {
        self.respiratory_rate.is_some()
            && self.oxygen_saturation.is_some()
            && self.temperature.is_some()
            && self.systolic_bp.is_some()
            && self.heart_rate.is_some()
            && self.consciousness.is_some()
    }

    /// Converts to a full [`VitalSigns`] snapshot, or `None` if incomplete.
    pub fn complete(&self) -> Option<VitalSigns> {
        Some(VitalSigns {
            respiratory_rate: self.respiratory_rate?,
            oxygen_saturation: self.oxygen_saturation?,
            temperature: self.temperature?,
            systolic_bp: self.systolic_bp?,
            heart_rate: self.heart_rate?,
            consciousness: self.consciousness?,
        })
    }
}
