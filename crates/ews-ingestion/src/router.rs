//! Router assembly for the ingestion service.

use axum::routing::{get, post};
use axum::Router;
use ews_support::health_routes;
use tower_http::trace::TraceLayer;

use crate::handlers::{get_patient_vitals, ingest_batch, ingest_sensor_reading};
use crate::state::AppState;

/// Build the full ingestion-service router.
pub fn create_router(state: AppState) -> Router {
    let health = state.health.clone();
    Router::new()
        .route("/api/data/sensor", post(ingest_sensor_reading))
        .route("/api/data/batch", post(ingest_batch))
        .route("/api/data/patient/{patientId}", get(get_patient_vitals))
        .with_state(state)
        .merge(health_routes(health))
        .layer(TraceLayer::new_for_http())
}
