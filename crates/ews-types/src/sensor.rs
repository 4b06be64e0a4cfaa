//! Sensor readings and per-sensor consensus records (spec §3, owned by C2).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six vital-sign channels an edge node can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorType {
    RespRate,
    Spo2,
    Temperature,
    BpSystolic,
    HeartRate,
    Consciousness,
}

impl SensorType {
    /// The vital name this sensor type maps to in a [`crate::vitals::VitalSigns`] vector.
    pub fn vital_name(self) -> &'static str {
        match self {
            SensorType::RespRate => "respiratoryRate",
            SensorType::Spo2 => "oxygenSaturation",
            SensorType::Temperature => "temperature",
            SensorType::BpSystolic => "systolicBP",
            SensorType::HeartRate => "heartRate",
            SensorType::Consciousness => "consciousness",
        }
    }

    /// All sensor types, in the fixed order a complete vital vector requires.
    pub const ALL: [SensorType; 6] = [
        SensorType::RespRate,
        SensorType::Spo2,
        SensorType::Temperature,
        SensorType::BpSystolic,
        SensorType::HeartRate,
        SensorType::Consciousness,
    ];
}

/// AVPU consciousness scale, encoded 0-3 on the wire (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Consciousness {
    Alert,
    Voice,
    Pain,
    Unresponsive,
}

impl Consciousness {
    /// Decode the integer encoding used on the wire (0=Alert .. 3=Unresponsive).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Consciousness::Alert),
            1 => Some(Consciousness::Voice),
            2 => Some(Consciousness::Pain),
            3 => Some(Consciousness::Unresponsive),
            _ => None,
        }
    }

    /// Encode back to the wire integer.
    pub fn to_code(self) -> i64 {
        match self {
            Consciousness::Alert => 0,
            Consciousness::Voice => 1,
            Consciousness::Pain => 2,
            Consciousness::Unresponsive => 3,
        }
    }
}

/// One observation from one edge node. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub patient_id: String,
    pub sensor_type: SensorType,
    /// Real-valued measurement. For `Consciousness`, this carries the 0-3 AVPU code.
    pub value: f64,
    pub unit: String,
    pub observed_at: DateTime<Utc>,
    pub node_id: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// How a [`SensorConsensus`] (or [`crate::score::ScoreConsensus`]) was derived.
///
/// `None` is a distinct, explicitly representable outcome from "missing" —
/// it means consensus was attempted and failed, not that it was never run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusMethod {
    Single,
    Majority,
    Average,
    Latest,
    None,
}

/// A reading that participated in a consensus computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipatingReading {
    pub node_id: String,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

/// The agreed value for one (patient, sensorType) over a consensus window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConsensus {
    pub patient_id: String,
    pub sensor_type: SensorType,
    /// Invariant: `participating.len() >= 1`.
    pub participating: Vec<ParticipatingReading>,
    /// Always set, even when `valid == false` — downstream decides whether to trust it.
    pub consensus_value: f64,
    pub consensus_at: DateTime<Utc>,
    pub valid: bool,
    pub method: ConsensusMethod,
}

impl SensorConsensus {
    /// Invariant check used by tests and defensive assertions at construction sites:
    /// `valid = false` implies `method = none` and vice versa.
    pub fn method_consistent_with_validity(&self) -> bool {
        (self.valid && self.method != ConsensusMethod::None)
            || (!self.valid && self.method == ConsensusMethod::None)
    }
}
