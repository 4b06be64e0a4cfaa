//! # Health Check Module
//!
//! Liveness, readiness, and startup probes for the three EWS service binaries.
//!
//! Unlike a single monolith, each EWS service depends on a different set of
//! downstream systems (the ingestion service on the event bus, the scoring
//! service on the event store, the alert service on notification channels),
//! so readiness is tracked as a pluggable map of named components rather than
//! a fixed struct.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ews_support::health::{health_routes, HealthState};
//!
//! let health_state = HealthState::new();
//! health_state.set_component("event_store", ComponentHealth::up());
//! health_state.set_ready(true);
//!
//! let app: Router<()> = Router::new().merge(health_routes(health_state));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::RwLock;
use serde::Serialize;

/// Health status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Component is healthy.
    Up,
    /// Component is unhealthy.
    Down,
    /// Component status is unknown.
    Unknown,
}

/// Individual component health.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    /// Component status.
    pub status: HealthStatus,
    /// Optional latency in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentHealth {
    /// Create a healthy component.
    pub fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            latency_ms: None,
            details: None,
        }
    }

    /// Create a healthy component with latency.
    pub fn up_with_latency(latency: Duration) -> Self {
        Self {
            status: HealthStatus::Up,
            latency_ms: Some(latency.as_millis() as u64),
            details: None,
        }
    }

    /// Create an unhealthy component.
    pub fn down() -> Self {
        Self {
            status: HealthStatus::Down,
            latency_ms: None,
            details: None,
        }
    }

    /// Create an unhealthy component with reason.
    pub fn down_with_reason(reason: &str) -> Self {
        Self {
            status: HealthStatus::Down,
            latency_ms: None,
            details: Some(serde_json::json!({ "reason": reason })),
        }
    }
}

/// Liveness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Readiness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Component health checks, keyed by component name.
    pub checks: HashMap<String, ComponentHealth>,
}

/// Startup probe response.
#[derive(Debug, Clone, Serialize)]
pub struct StartupResponse {
    /// Overall status.
    pub status: HealthStatus,
}

/// Overall health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Version info.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Component checks, keyed by component name.
    pub checks: HashMap<String, ComponentHealth>,
}

/// Health state for tracking component health, shared across a service's router.
#[derive(Clone)]
pub struct HealthState {
    start_time: Instant,
    startup_complete: Arc<AtomicBool>,
    ready: Arc<AtomicBool>,
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state with no registered components.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            startup_complete: Arc::new(AtomicBool::new(false)),
            ready: Arc::new(AtomicBool::new(false)),
            components: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get uptime in seconds.
    pub fn uptime(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Mark startup as complete.
    pub fn set_startup_complete(&self, complete: bool) {
        self.startup_complete.store(complete, Ordering::SeqCst);
    }

    /// Check if startup is complete.
    pub fn is_startup_complete(&self) -> bool {
        self.startup_complete.load(Ordering::SeqCst)
    }

    /// Set readiness state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if service is ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Set or replace a named dependency's health (e.g. `"event_store"`, `"event_bus"`, `"smtp"`).
    pub fn set_component(&self, name: &str, health: ComponentHealth) {
        self.components.write().insert(name.to_string(), health);
    }

    /// Snapshot all registered component checks.
    fn checks(&self) -> HashMap<String, ComponentHealth> {
        self.components.read().clone()
    }

    /// `true` if every registered component reports [`HealthStatus::Up`].
    fn all_components_up(&self) -> bool {
        self.components
            .read()
            .values()
            .all(|c| c.status == HealthStatus::Up)
    }
}

/// Create health check routes (`/health`, `/health/live`, `/health/ready`, `/health/startup`).
pub fn health_routes<S>(state: HealthState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/health/startup", get(startup_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<HealthState>) -> Response {
    let overall_status = if state.is_ready() && state.all_components_up() {
        HealthStatus::Up
    } else {
        HealthStatus::Down
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime(),
        checks: state.checks(),
    };

    let status_code = match overall_status {
        HealthStatus::Up => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response)).into_response()
}

async fn liveness_handler(State(state): State<HealthState>) -> Response {
    let response = LivenessResponse {
        status: HealthStatus::Up,
        uptime_seconds: state.uptime(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

async fn readiness_handler(State(state): State<HealthState>) -> Response {
    if !state.is_ready() {
        let response = ReadinessResponse {
            status: HealthStatus::Down,
            checks: state.checks(),
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response();
    }

    let overall_status = if state.all_components_up() {
        HealthStatus::Up
    } else {
        HealthStatus::Down
    };

    let response = ReadinessResponse {
        status: overall_status,
        checks: state.checks(),
    };

    let status_code = match overall_status {
        HealthStatus::Up => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response)).into_response()
}

async fn startup_handler(State(state): State<HealthState>) -> Response {
    if state.is_startup_complete() {
        (
            StatusCode::OK,
            Json(StartupResponse {
                status: HealthStatus::Up,
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StartupResponse {
                status: HealthStatus::Down,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_and_readiness_flags_default_false() {
        let state = HealthState::new();
        assert!(!state.is_startup_complete());
        assert!(!state.is_ready());

        state.set_startup_complete(true);
        state.set_ready(true);

        assert!(state.is_startup_complete());
        assert!(state.is_ready());
    }

    #[test]
    fn all_components_up_is_vacuously_true_with_no_components() {
        let state = HealthState::new();
        assert!(state.all_components_up());
    }

    #[test]
    fn one_down_component_fails_the_aggregate() {
        let state = HealthState::new();
        state.set_component("event_store", ComponentHealth::up());
        state.set_component("event_bus", ComponentHealth::down_with_reason("unreachable"));
        assert!(!state.all_components_up());
    }

    #[test]
    fn component_health_constructors() {
        let up = ComponentHealth::up();
        assert_eq!(up.status, HealthStatus::Up);

        let down = ComponentHealth::down_with_reason("timeout");
        assert_eq!(down.status, HealthStatus::Down);
        assert!(down.details.is_some());
    }
}
