//! # EWS Scoring & Event-Sourced Score-Consensus Service
//!
//! Consumes per-node NEWS2 score events, reconciles them into a
//! `ScoreConsensus` (C3), persists both to the append-only event log and
//! projects the result onto the per-patient read model (C5), and publishes
//! `ews.consensus` for the alert service to react to.

#![forbid(unsafe_code)]

pub mod config;
pub mod consumer;
pub mod handlers;
pub mod pipeline;
pub mod router;
pub mod state;

pub use config::ScoringConfig;
pub use router::create_router;
pub use state::AppState;
