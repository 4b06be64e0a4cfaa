//! Router assembly for the scoring service.

use axum::routing::{get, post};
use axum::Router;
use ews_support::health_routes;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    batch_calculate_ews, calculate_ews, get_consensus, high_risk_patients,
    latest_patient_score, patient_score_history, query_events, stats_overview,
};
use crate::state::AppState;

/// Build the full scoring-service router.
pub fn create_router(state: AppState) -> Router {
    let health = state.health.clone();
    Router::new()
        .route("/api/command/calculate-ews", post(calculate_ews))
        .route("/api/command/batch-calculate-ews", post(batch_calculate_ews))
        .route("/api/query/patient/{patientId}/latest", get(latest_patient_score))
        .route("/api/query/patient/{patientId}/history", get(patient_score_history))
        .route("/api/query/consensus/{consensusId}", get(get_consensus))
        .route("/api/query/events", get(query_events))
        .route("/api/query/stats/overview", get(stats_overview))
        .route("/api/query/high-risk-patients", get(high_risk_patients))
        .with_state(state)
        .merge(health_routes(health))
        .layer(TraceLayer::new_for_http())
}
