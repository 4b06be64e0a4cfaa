//! # EWS Consensus
//!
//! Two-tier fan-in quorum consensus over short, stored-timestamp windows
//! (C2 sensor-value consensus, C3 score consensus) and the vital-completeness
//! detector that gates C1 (C4). All state here is in-memory and
//! process-local; persistence of the outcomes is [`ews_store`]'s job.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod completeness;
mod error;
mod quorum;
mod score_consensus;
mod sensor_consensus;

pub use completeness::CompletenessDetector;
pub use error::{ConsensusError, Result};
pub use quorum::{reduce, ConsensusOutcome, Participant, Tolerance};
pub use score_consensus::ScoreConsensusEngine;
pub use sensor_consensus::SensorConsensusEngine;
