//! Integration tests exercising the scoring service's HTTP surface end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ews_bus::InMemoryBus;
use ews_consensus::ScoreConsensusEngine;
use ews_scoring_service::{create_router, AppState};
use ews_store::{InMemoryStore, ReadModelProjector, ReadModelStore};
use ews_support::HealthState;
use ews_types::{Consciousness, VitalSigns};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    let health = HealthState::new();
    health.set_ready(true);
    health.set_startup_complete(true);
    let store: Arc<dyn ReadModelStore> = Arc::new(InMemoryStore::new());
    let state = AppState {
        score_consensus: Arc::new(ScoreConsensusEngine::new()),
        event_store: Arc::new(InMemoryStore::new()),
        projector: Arc::new(ReadModelProjector::new(store.clone())),
        read_store: store,
        bus: Arc::new(InMemoryBus::new()),
        health,
    };
    create_router(state)
}

fn calculate_ews_body(patient_id: &str) -> serde_json::Value {
    let vitals = VitalSigns {
        respiratory_rate: 18.0,
        oxygen_saturation: 96.0,
        temperature: 37.0,
        systolic_bp: 120.0,
        heart_rate: 80.0,
        consciousness: Consciousness::Alert,
    };
    json!({
        "patientId": patient_id,
        "nodeId": "n1",
        "vitalSigns": vitals,
    })
}

#[tokio::test]
async fn health_endpoint_reports_up() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn calculating_ews_then_querying_latest_round_trips() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/command/calculate-ews")
                .header("content-type", "application/json")
                .body(Body::from(calculate_ews_body("p1").to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/query/patient/p1/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn latest_score_is_not_found_before_any_event() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/query/patient/unknown/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
