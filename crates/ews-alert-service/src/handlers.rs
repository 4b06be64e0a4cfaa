//! HTTP handlers for the alert service (spec §6): alert commands/queries,
//! subscription CRUD, and notification queries/resend.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use ews_types::{
    Alert, AlertSeverity, AlertStatus, ApiError, ApiResult, Channel, Notification, Subscription,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::pipeline::{escalate_alert as escalate_alert_pipeline, raise_alert, EscalateError, RaiseAlert};
use crate::state::AppState;

/// Request body for `POST /api/alerts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub patient_id: String,
    pub source_service: String,
    pub alert_type: ews_types::AlertType,
    pub alert_severity: AlertSeverity,
    pub message: String,
    pub timestamp: Option<chrono::DateTime<Utc>>,
    pub sensor_data: Option<serde_json::Value>,
    pub ews_data: Option<serde_json::Value>,
}

/// `POST /api/alerts`.
pub async fn create_alert(
    State(state): State<AppState>,
    Json(body): Json<CreateAlertRequest>,
) -> ApiResult<Json<Alert>> {
    let alert = raise_alert(
        &state,
        RaiseAlert {
            patient_id: body.patient_id,
            source_service: body.source_service,
            alert_type: body.alert_type,
            alert_severity: body.alert_severity,
            message: body.message,
            observed_at: body.timestamp.unwrap_or_else(Utc::now),
            sensor_data: body.sensor_data,
            ews_data: body.ews_data,
        },
    )
    .await;
    Ok(Json(alert))
}

/// Query-string filters accepted by `GET /api/alerts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlertsParams {
    pub patient_id: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
    pub from: Option<chrono::DateTime<Utc>>,
    pub to: Option<chrono::DateTime<Utc>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// `GET /api/alerts`.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<ListAlertsParams>,
) -> ApiResult<Json<Vec<Alert>>> {
    let filtered: Vec<Alert> = state
        .store
        .list_alerts()
        .into_iter()
        .filter(|a| params.patient_id.as_deref().map_or(true, |p| a.patient_id == p))
        .filter(|a| params.status.map_or(true, |s| a.status == s))
        .filter(|a| params.severity.map_or(true, |s| a.alert_severity == s))
        .filter(|a| params.from.map_or(true, |from| a.observed_at >= from))
        .filter(|a| params.to.map_or(true, |to| a.observed_at <= to))
        .skip(params.offset.unwrap_or(0))
        .take(params.limit.unwrap_or(usize::MAX))
        .collect();
    Ok(Json(filtered))
}

/// Body for the acknowledge/resolve/escalate transition endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest {
    pub user_id: String,
}

/// `PUT /api/alerts/{alertId}/acknowledge`.
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(body): Json<AcknowledgeRequest>,
) -> ApiResult<Json<Alert>> {
    transition(&state, alert_id, |alert| {
        alert.acknowledge(body.user_id.clone(), Utc::now())
    })
}

/// Body for `PUT /api/alerts/{alertId}/resolve`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub user_id: String,
    pub resolution: Option<String>,
}

/// `PUT /api/alerts/{alertId}/resolve`.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(body): Json<ResolveRequest>,
) -> ApiResult<Json<Alert>> {
    transition(&state, alert_id, |alert| {
        alert.resolve(body.user_id.clone(), body.resolution.clone(), Utc::now())
    })
}

/// Body for `PUT /api/alerts/{alertId}/escalate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateRequest {
    pub reason: Option<String>,
}

/// `PUT /api/alerts/{alertId}/escalate`. Lifts the alert's status/priority and
/// dispatches a fresh round of notifications against the narrower
/// department-level, HIGH-minSeverity escalation query (spec §4.7).
pub async fn escalate_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(body): Json<EscalateRequest>,
) -> ApiResult<Json<Alert>> {
    escalate_alert_pipeline(&state, alert_id, body.reason.clone())
        .await
        .map(Json)
        .map_err(|e| match e {
            EscalateError::NotFound => ApiError::NotFound(format!("no alert {alert_id}")),
            EscalateError::Transition(e) => ApiError::StateTransition(e.to_string()),
        })
}

fn transition(
    state: &AppState,
    alert_id: Uuid,
    apply: impl FnOnce(&mut Alert) -> Result<(), ews_types::AlertTransitionError>,
) -> ApiResult<Json<Alert>> {
    let mut alert = state
        .store
        .get_alert(alert_id)
        .ok_or_else(|| ApiError::NotFound(format!("no alert {alert_id}")))?;
    apply(&mut alert).map_err(|e| ApiError::StateTransition(e.to_string()))?;
    state.store.put_alert(alert.clone());
    Ok(Json(alert))
}

/// `GET /api/subscriptions`.
pub async fn list_subscriptions(State(state): State<AppState>) -> Json<Vec<Subscription>> {
    Json(state.store.list_subscriptions())
}

/// `GET /api/subscriptions/{subscriptionId}`.
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
) -> ApiResult<Json<Subscription>> {
    state
        .store
        .get_subscription(subscription_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no subscription {subscription_id}")))
}

/// Request body for creating/replacing a subscription.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub subscriber_type: ews_types::SubscriberType,
    pub subscriber_id: String,
    pub patient_id: Option<String>,
    #[serde(default)]
    pub alert_types: Vec<ews_types::AlertType>,
    pub min_severity: AlertSeverity,
    pub channels: Vec<Channel>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// `POST /api/subscriptions`.
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(body): Json<SubscriptionRequest>,
) -> ApiResult<Json<Subscription>> {
    if body.channels.is_empty() {
        return Err(ApiError::Validation("subscription requires at least one channel".to_string()));
    }
    let subscription = Subscription {
        subscription_id: Uuid::new_v4(),
        subscriber_type: body.subscriber_type,
        subscriber_id: body.subscriber_id,
        patient_id: body.patient_id,
        alert_types: body.alert_types,
        min_severity: body.min_severity,
        channels: body.channels,
        active: body.active,
    };
    state.store.put_subscription(subscription.clone());
    Ok(Json(subscription))
}

/// `PUT /api/subscriptions/{subscriptionId}`.
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
    Json(body): Json<SubscriptionRequest>,
) -> ApiResult<Json<Subscription>> {
    if body.channels.is_empty() {
        return Err(ApiError::Validation("subscription requires at least one channel".to_string()));
    }
    state
        .store
        .get_subscription(subscription_id)
        .ok_or_else(|| ApiError::NotFound(format!("no subscription {subscription_id}")))?;
    let subscription = Subscription {
        subscription_id,
        subscriber_type: body.subscriber_type,
        subscriber_id: body.subscriber_id,
        patient_id: body.patient_id,
        alert_types: body.alert_types,
        min_severity: body.min_severity,
        channels: body.channels,
        active: body.active,
    };
    state.store.put_subscription(subscription.clone());
    Ok(Json(subscription))
}

/// `DELETE /api/subscriptions/{subscriptionId}`.
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
) -> ApiResult<()> {
    if state.store.remove_subscription(subscription_id) {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("no subscription {subscription_id}")))
    }
}

/// Query-string filters for `GET /api/notifications`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsParams {
    pub alert_id: Option<Uuid>,
}

/// `GET /api/notifications`.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<ListNotificationsParams>,
) -> Json<Vec<Notification>> {
    let notifications = match params.alert_id {
        Some(alert_id) => state.store.notifications_for_alert(alert_id),
        None => state.store.list_notifications(),
    };
    Json(notifications)
}

/// `POST /api/notifications/{notificationId}/resend`.
pub async fn resend_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    let mut notification = state
        .store
        .get_notification(notification_id)
        .ok_or_else(|| ApiError::NotFound(format!("no notification {notification_id}")))?;

    state
        .dispatcher
        .resend(&mut notification)
        .await
        .map_err(|e| ApiError::StateTransition(e.to_string()))?;

    state.store.put_notification(notification.clone());
    Ok(Json(notification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query as AxQuery, State as AxState};
    use ews_alerts::NotificationDispatcher;
    use ews_bus::InMemoryBus;
    use ews_support::HealthState;
    use ews_types::{AlertType, ChannelKind};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState {
            store: Arc::new(crate::store::AlertStore::new()),
            dispatcher: Arc::new(NotificationDispatcher::new(vec![])),
            bus: Arc::new(InMemoryBus::new()),
            health: HealthState::new(),
        }
    }

    #[tokio::test]
    async fn creating_an_alert_persists_it_without_matching_subscriptions() {
        let state = state();
        let alert = create_alert(
            AxState(state.clone()),
            Json(CreateAlertRequest {
                patient_id: "p1".to_string(),
                source_service: "test".to_string(),
                alert_type: AlertType::EwsCritical,
                alert_severity: AlertSeverity::High,
                message: "test alert".to_string(),
                timestamp: None,
                sensor_data: None,
                ews_data: None,
            }),
        )
        .await
        .unwrap()
        .0;
        assert!(alert.notification_ids.is_empty());

        let listed = list_alerts(AxState(state), AxQuery(ListAlertsParams::default()))
            .await
            .unwrap()
            .0;
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn acknowledging_unknown_alert_is_not_found() {
        let state = state();
        let result = acknowledge_alert(
            AxState(state),
            Path(Uuid::new_v4()),
            Json(AcknowledgeRequest { user_id: "u1".to_string() }),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn creating_subscription_without_channels_is_rejected() {
        let state = state();
        let result = create_subscription(
            AxState(state),
            Json(SubscriptionRequest {
                subscriber_type: ews_types::SubscriberType::Staff,
                subscriber_id: "s1".to_string(),
                patient_id: None,
                alert_types: vec![],
                min_severity: AlertSeverity::Low,
                channels: vec![],
                active: true,
            }),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn subscription_channel_kind_round_trips() {
        let state = state();
        let subscription = create_subscription(
            AxState(state.clone()),
            Json(SubscriptionRequest {
                subscriber_type: ews_types::SubscriberType::Staff,
                subscriber_id: "s1".to_string(),
                patient_id: None,
                alert_types: vec![],
                min_severity: AlertSeverity::Low,
                channels: vec![Channel {
                    kind: ChannelKind::Email,
                    contact: "a@example.com".to_string(),
                    enabled: true,
                }],
                active: true,
            }),
        )
        .await
        .unwrap()
        .0;

        let fetched = get_subscription(AxState(state), Path(subscription.subscription_id))
            .await
            .unwrap()
            .0;
        assert_eq!(fetched.subscriber_id, "s1");
    }
}
