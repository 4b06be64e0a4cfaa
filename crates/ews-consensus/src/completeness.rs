//! C4: Vital-Completeness Detector.
//!
//! Tracks the latest valid [`SensorConsensus`] per `(patientId, sensorType)`
//! and decides, on each update, whether a complete and fresh six-vital vector
//! now exists for the NEWS2 scorer (C1) to consume.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use ews_types::{Consciousness, SensorConsensus, SensorType, VitalSigns, VitalSignsBuilder};
use parking_lot::Mutex;

/// A consensus older than this relative to the freshness reference point is
/// too stale to contribute to a vital vector (spec §4.3).
const FRESHNESS_WINDOW_MINUTES: i64 = 5;

/// Tracks the most recent valid consensus per sensor type, per patient.
#[derive(Default)]
pub struct CompletenessDetector {
    latest: Mutex<HashMap<(String, SensorType), SensorConsensus>>,
}

impl CompletenessDetector {
    /// A fresh detector with no retained state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly computed consensus. Invalid consensuses are tracked too —
    /// they must still be able to invalidate a previously-fresh reading of the
    /// same type if it is replaced — but only valid ones ever contribute to a
    /// completed vector.
    pub fn record_consensus(&self, consensus: SensorConsensus) {
        let key = (consensus.patient_id.clone(), consensus.sensor_type);
        self.latest.lock().insert(key, consensus);
    }

    /// Attempt to assemble a complete, fresh [`VitalSigns`] vector for a patient.
    ///
    /// Freshness is judged against each consensus's own stored `consensus_at`
    /// timestamp relative to `now`, never against wall-clock drift between
    /// sensor types (spec §4.3: "freshness cutoff of 5 minutes", evaluated per
    /// stored timestamp so a backfilled batch is judged consistently).
    pub fn check_completeness(&self, patient_id: &str, now: DateTime<Utc>) -> Option<VitalSigns> {
        let latest = self.latest.lock();
        let cutoff = now - Duration::minutes(FRESHNESS_WINDOW_MINUTES);

        let mut builder = VitalSignsBuilder::default();
        for sensor_type in SensorType::ALL {
            let consensus = latest.get(&(patient_id.to_string(), sensor_type))?;
            if !consensus.valid || consensus.consensus_at < cutoff {
                return None;
            }
            assign(&mut builder, sensor_type, consensus.consensus_value);
        }
        builder.complete()
    }
}

fn assign(builder: &mut VitalSignsBuilder, sensor_type: SensorType, value: f64) {
    match sensor_type {
        SensorType::RespRate => builder.respiratory_rate = Some(value),
        SensorType::Spo2 => builder.oxygen_saturation = Some(value),
        SensorType::Temperature => builder.temperature = Some(value),
        SensorType::BpSystolic => builder.systolic_bp = Some(value),
        SensorType::HeartRate => builder.heart_rate = Some(value),
        SensorType::Consciousness => {
            builder.consciousness = Consciousness::from_code(value.round() as i64);
        }
    }
}
