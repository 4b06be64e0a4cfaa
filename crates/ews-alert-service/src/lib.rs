//! # EWS Alert Dispatch Service
//!
//! Consumes score-consensus records, prioritises and classifies them into
//! alerts (C7), matches active subscriptions, and drives notification
//! delivery through its state machine (C8). Also exposes direct command/query
//! HTTP endpoints for manual alert creation and subscription management.

#![forbid(unsafe_code)]

pub mod config;
pub mod consumer;
pub mod handlers;
pub mod pipeline;
pub mod router;
pub mod state;
pub mod store;

pub use config::AlertConfig;
pub use router::create_router;
pub use state::AppState;
pub use store::AlertStore;
