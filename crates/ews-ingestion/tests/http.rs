//! Integration tests exercising the ingestion service's HTTP surface end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ews_bus::InMemoryBus;
use ews_consensus::{CompletenessDetector, SensorConsensusEngine};
use ews_ingestion::store::SensorConsensusStore;
use ews_ingestion::{create_router, AppState};
use ews_support::HealthState;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    let health = HealthState::new();
    health.set_ready(true);
    health.set_startup_complete(true);
    let state = AppState {
        sensor_consensus: Arc::new(SensorConsensusEngine::new()),
        completeness: Arc::new(CompletenessDetector::new()),
        consensus_history: Arc::new(SensorConsensusStore::new()),
        bus: Arc::new(InMemoryBus::new()),
        node_id: "test-node".to_string(),
        health,
    };
    create_router(state)
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
async fn single_sensor_reading_is_accepted_but_not_yet_scored() {
    let body = json!({
        "patientId": "p1",
        "sensorType": "heartRate",
        "value": 72.0,
        "unit": "bpm",
        "observedAt": chrono::Utc::now().to_rfc3339(),
        "nodeId": "n1",
    });

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/data/sensor")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn patient_vitals_are_not_found_with_no_readings() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/data/patient/p1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patient_vitals_round_trip_after_a_reading() {
    let app = app();
    let body = json!({
        "patientId": "p1",
        "sensorType": "heartRate",
        "value": 72.0,
        "unit": "bpm",
        "observedAt": chrono::Utc::now().to_rfc3339(),
        "nodeId": "n1",
    });
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/data/sensor")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/data/patient/p1?sensorType=heartRate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn batch_ingest_rejects_an_empty_readings_array() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/data/batch")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "readings": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_ingest_accepts_the_wrapped_readings_envelope() {
    let body = json!({
        "readings": [{
            "patientId": "p1",
            "sensorType": "heartRate",
            "value": 72.0,
            "unit": "bpm",
            "observedAt": chrono::Utc::now().to_rfc3339(),
            "nodeId": "n1",
        }],
    });
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/data/batch")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
