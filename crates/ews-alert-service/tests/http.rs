//! Integration tests exercising the alert service's HTTP surface end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ews_alert_service::{create_router, AlertStore, AppState};
use ews_alerts::NotificationDispatcher;
use ews_bus::InMemoryBus;
use ews_support::HealthState;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    let health = HealthState::new();
    health.set_ready(true);
    health.set_startup_complete(true);
    let state = AppState {
        store: Arc::new(AlertStore::new()),
        dispatcher: Arc::new(NotificationDispatcher::new(vec![])),
        bus: Arc::new(InMemoryBus::new()),
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
async fn creating_and_listing_an_alert_round_trips() {
    let app = app();
    let body = json!({
        "patientId": "p1",
        "sourceService": "test",
        "alertType": "EWS_CRITICAL",
        "alertSeverity": "HIGH",
        "message": "critical score",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/alerts")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/api/alerts").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn creating_a_subscription_without_channels_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/subscriptions")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "subscriberType": "STAFF",
                        "subscriberId": "s1",
                        "minSeverity": "LOW",
                        "channels": [],
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
