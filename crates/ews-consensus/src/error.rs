//! Consensus-engine errors.

use thiserror::Error;

/// Errors raised by the consensus engines (C2/C3) and completeness detector (C4).
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// A reading/event was handed to the engine with no participants at all —
    /// should never happen since the triggering item always participates.
    #[error("no participants for consensus computation")]
    EmptyParticipantSet,

    /// The underlying NEWS2 scorer rejected the completed vital vector.
    #[error("scoring failed: {0}")]
    Scoring(#[from] ews_scoring::ScoringError),
}

/// Result alias for consensus operations.
pub type Result<T> = std::result::Result<T, ConsensusError>;
