//! Router assembly for the alert service.

use axum::routing::{delete, get, post, put};
use axum::Router;
use ews_support::health_routes;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    acknowledge_alert, create_alert, create_subscription, delete_subscription, escalate_alert,
    get_subscription, list_alerts, list_notifications, list_subscriptions, resend_notification,
    resolve_alert, update_subscription,
};
use crate::state::AppState;

/// Build the full alert-service router.
pub fn create_router(state: AppState) -> Router {
    let health = state.health.clone();
    Router::new()
        .route("/api/alerts", post(create_alert).get(list_alerts))
        .route("/api/alerts/{alertId}/acknowledge", put(acknowledge_alert))
        .route("/api/alerts/{alertId}/resolve", put(resolve_alert))
        .route("/api/alerts/{alertId}/escalate", put(escalate_alert))
        .route(
            "/api/subscriptions",
            post(create_subscription).get(list_subscriptions),
        )
        .route(
            "/api/subscriptions/{subscriptionId}",
            get(get_subscription).put(update_subscription).delete(delete_subscription),
        )
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/{notificationId}/resend", post(resend_notification))
        .with_state(state)
        .merge(health_routes(health))
        .layer(TraceLayer::new_for_http())
}
