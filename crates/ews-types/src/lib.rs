//! # EWS Types
//!
//! Shared domain types for the early-warning-score platform: sensor readings
//! and per-sensor consensus (C2), the derived vital-sign view (C4), score
//! events and score-consensus records plus the patient read model (C5), and
//! the alert/subscription/notification triad (C7/C8).
//!
//! These types cross every process boundary in the system unchanged — the
//! HTTP APIs of all three services, the event-bus message bodies, and the
//! document-store records all serialize through the same `serde` derives
//! defined here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alert;
pub mod error;
pub mod notification;
pub mod score;
pub mod sensor;
pub mod subscription;
pub mod vitals;

pub use alert::{Alert, AlertSeverity, AlertStatus, AlertTransitionError, AlertType};
pub use error::{ApiError, ApiResult};
pub use notification::{Notification, NotificationStatus, NotificationTransitionError};
pub use score::{
    ClinicalRisk, PatientReadModel, ScoreComponents, ScoreConsensus, ScoreEvent, ScoreEventKind,
    ScoreHistoryEntry, SCORE_HISTORY_CAPACITY,
};
pub use sensor::{Consciousness, ConsensusMethod, ParticipatingReading, SensorConsensus, SensorReading, SensorType};
pub use subscription::{Channel, ChannelKind, Subscription, SubscriberType};
pub use vitals::{VitalSigns, VitalSignsBuilder};
