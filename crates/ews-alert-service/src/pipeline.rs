//! The C7 -> C8 pipeline shared by the bus consumer and the manual alert
//! command endpoint: raise an alert, match active subscriptions, create and
//! dispatch one notification per matched channel.

use chrono::{DateTime, Utc};
use ews_alerts::{classify, escalation_subscriptions, matching_subscriptions, priority};
use ews_types::{
    Alert, AlertSeverity, AlertStatus, AlertTransitionError, AlertType, Notification,
    ScoreConsensus, Subscription,
};
use uuid::Uuid;

use crate::state::AppState;

/// Fields needed to raise an alert, independent of whether they came from a
/// classified [`ScoreConsensus`] or a direct `POST /api/alerts` request.
pub struct RaiseAlert {
    pub patient_id: String,
    pub source_service: String,
    pub alert_type: AlertType,
    pub alert_severity: AlertSeverity,
    pub message: String,
    pub observed_at: DateTime<Utc>,
    pub sensor_data: Option<serde_json::Value>,
    pub ews_data: Option<serde_json::Value>,
}

/// Classify `consensus` (spec §4.7) and, if it warrants an alert, raise it.
/// Returns `None` when the consensus classifies as no-alert.
pub async fn process_consensus(state: &AppState, consensus: ScoreConsensus) -> Option<Alert> {
    let (alert_type, severity) = classify(&consensus)?;
    let ews_data = serde_json::to_value(&consensus).ok();
    let raise = RaiseAlert {
        patient_id: consensus.patient_id.clone(),
        source_service: "ews-scoring-service".to_string(),
        alert_type,
        alert_severity: severity,
        message: format!(
            "{alert_type:?} for patient {} (score {}, {:?})",
            consensus.patient_id, consensus.consensus_score, consensus.clinical_risk
        ),
        observed_at: consensus.consensus_at,
        sensor_data: None,
        ews_data,
    };
    Some(raise_alert(state, raise).await)
}

/// Raise an alert, match active subscriptions, and dispatch a notification
/// per matched, enabled channel (spec §4.7, §4.8).
pub async fn raise_alert(state: &AppState, raise: RaiseAlert) -> Alert {
    let pri = priority(raise.alert_type, raise.alert_severity);

    let mut alert = Alert {
        alert_id: Uuid::new_v4(),
        patient_id: raise.patient_id,
        source_service: raise.source_service,
        alert_type: raise.alert_type,
        alert_severity: raise.alert_severity,
        message: raise.message,
        observed_at: raise.observed_at,
        sensor_data: raise.sensor_data,
        ews_data: raise.ews_data,
        status: AlertStatus::New,
        priority: pri,
        acknowledged_by: None,
        acknowledged_at: None,
        resolved_by: None,
        resolved_at: None,
        resolution: None,
        escalated_at: None,
        escalation_reason: None,
        notification_ids: Vec::new(),
    };

    let subscriptions = state.store.active_subscriptions();
    let matched = matching_subscriptions(&alert, &subscriptions);
    dispatch_to(state, &mut alert, &matched).await;

    ews_support::METRICS.alerts_raised_total.inc();
    tracing::info!(
        patient_id = %alert.patient_id,
        alert_type = ?alert.alert_type,
        priority = alert.priority,
        notifications = alert.notification_ids.len(),
        "alert raised"
    );

    state.store.put_alert(alert.clone());
    alert
}

/// Escalate an alert (spec §4.7): lift status, raise priority, and emit a
/// fresh round of notifications against the narrower escalation-tier query
/// (department-level subscriptions with `minSeverity = HIGH`).
pub async fn escalate_alert(
    state: &AppState,
    alert_id: Uuid,
    reason: Option<String>,
) -> Result<Alert, EscalateError> {
    let mut alert = state
        .store
        .get_alert(alert_id)
        .ok_or(EscalateError::NotFound)?;

    alert
        .escalate(reason, Utc::now())
        .map_err(EscalateError::Transition)?;

    let subscriptions = state.store.active_subscriptions();
    let matched = escalation_subscriptions(&alert, &subscriptions);
    dispatch_to(state, &mut alert, &matched).await;

    tracing::info!(
        patient_id = %alert.patient_id,
        alert_id = %alert.alert_id,
        priority = alert.priority,
        notifications = alert.notification_ids.len(),
        "alert escalated"
    );

    state.store.put_alert(alert.clone());
    Ok(alert)
}

/// Failure modes for [`escalate_alert`], distinguished so the HTTP handler can
/// map them to the right status code.
pub enum EscalateError {
    NotFound,
    Transition(AlertTransitionError),
}

/// Dispatch one notification per enabled channel on each matched
/// subscription, appending the resulting ids onto `alert` and persisting
/// each notification (spec §4.7, §4.8). Shared by the initial-raise and
/// escalation paths, which differ only in which subscriptions match.
async fn dispatch_to(state: &AppState, alert: &mut Alert, matched: &[&Subscription]) {
    for subscription in matched {
        for channel in subscription.channels.iter().filter(|c| c.enabled) {
            let mut notification = Notification::new_pending(
                alert.alert_id,
                alert.patient_id.clone(),
                channel.kind,
                channel.contact.clone(),
                alert.message.clone(),
                Utc::now(),
            );

            if let Err(err) = state.dispatcher.dispatch(&mut notification).await {
                tracing::warn!(error = %err, notification_id = %notification.notification_id, "notification dispatch failed");
            }

            ews_support::METRICS.record_dispatch(
                channel_metric_name(channel.kind),
                if notification.status == ews_types::NotificationStatus::Sent {
                    "sent"
                } else {
                    "failed"
                },
            );

            alert.notification_ids.push(notification.notification_id);
            state.store.put_notification(notification);
        }
    }
}

fn channel_metric_name(kind: ews_types::ChannelKind) -> &'static str {
    match kind {
        ews_types::ChannelKind::Email => "email",
        ews_types::ChannelKind::Sms => "sms",
        ews_types::ChannelKind::Webhook => "webhook",
    }
}
