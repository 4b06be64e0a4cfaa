//! # EWS Ingestion Service
//!
//! Library half of the ingestion service binary: C2 sensor consensus, C4
//! completeness detection, and C1 NEWS2 scoring at the edge, wired behind an
//! axum router. Split from `main.rs` so the HTTP surface can be exercised
//! from `tests/` with `tower::ServiceExt::oneshot`.

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod store;

pub use config::IngestionConfig;
pub use router::create_router;
pub use state::AppState;
