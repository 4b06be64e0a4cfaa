//! Alert work items (spec §3, owned by C7/C8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority-ordered work item kinds (spec §4.7). `Sensor*` variants are
/// reserved for sensor-consensus-originated alerts outside the
/// `ScoreConsensus` classification table; the priority formula still
/// accounts for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    EwsCritical,
    EwsUrgent,
    EwsElevated,
    EwsDataInconsistency,
    SensorCritical,
    SensorWarning,
}

/// Alert severity (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// Alert lifecycle state (spec §4.8): `NEW -> ACKNOWLEDGED -> RESOLVED`, with
/// `NEW -> ESCALATED -> ACKNOWLEDGED -> RESOLVED` as an alternate arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
    Escalated,
}

/// A priority-ordered alert work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub alert_id: Uuid,
    pub patient_id: String,
    pub source_service: String,
    pub alert_type: AlertType,
    pub alert_severity: AlertSeverity,
    pub message: String,
    pub observed_at: DateTime<Utc>,
    #[serde(default)]
    pub sensor_data: Option<serde_json::Value>,
    #[serde(default)]
    pub ews_data: Option<serde_json::Value>,
    pub status: AlertStatus,
    /// 1-100, clamped (spec Testable property 10).
    pub priority: u8,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution: Option<String>,
    pub escalated_at: Option<DateTime<Utc>>,
    pub escalation_reason: Option<String>,
    /// References into the `Notification` store; Alert never holds the objects themselves.
    pub notification_ids: Vec<Uuid>,
}

/// Errors raised by illegal lifecycle transitions (spec §4.8).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AlertTransitionError {
    #[error("acknowledge requires status NEW or ESCALATED, got {0:?}")]
    CannotAcknowledge(AlertStatus),
    #[error("resolve is forbidden once an alert is RESOLVED")]
    AlreadyResolved,
    #[error("escalate is forbidden once an alert is RESOLVED")]
    CannotEscalateResolved,
}

impl Alert {
    /// Acknowledge requires status in {NEW, ESCALATED} (spec §4.8).
    pub fn acknowledge(
        &mut self,
        user_id: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), AlertTransitionError> {
        if !matches!(self.status, AlertStatus::New | AlertStatus::Escalated) {
            return Err(AlertTransitionError::CannotAcknowledge(self.status));
        }
        self.status = AlertStatus::Acknowledged;
        self.acknowledged_by = Some(user_id.into());
        self.acknowledged_at = Some(at);
        Ok(())
    }

    /// Resolve is forbidden when already RESOLVED (spec §4.8).
    pub fn resolve(
        &mut self,
        user_id: impl Into<String>,
        resolution: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), AlertTransitionError> {
        if self.status == AlertStatus::Resolved {
            return Err(AlertTransitionError::AlreadyResolved);
        }
        self.status = AlertStatus::Resolved;
        self.resolved_by = Some(user_id.into());
        self.resolved_at = Some(at);
        self.resolution = resolution;
        Ok(())
    }

    /// Escalate is forbidden when already RESOLVED (spec §4.7). Raises priority by 10, clamped.
    pub fn escalate(
        &mut self,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), AlertTransitionError> {
        if self.status == AlertStatus::Resolved {
            return Err(AlertTransitionError::CannotEscalateResolved);
        }
        self.status = AlertStatus::Escalated;
        self.escalated_at = Some(at);
        self.escalation_reason = reason;
        self.priority = self.priority.saturating_add(10).min(100);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_alert(status: AlertStatus) -> Alert {
        Alert {
            alert_id: Uuid::new_v4(),
            patient_id: "p1".into(),
            source_service: "scoring".into(),
            alert_type: AlertType::EwsUrgent,
            alert_severity: AlertSeverity::Medium,
            message: "test".into(),
            observed_at: Utc::now(),
            sensor_data: None,
            ews_data: None,
            status,
            priority: 65,
            acknowledged_by: None,
            acknowledged_at: None,
            resolved_by: None,
            resolved_at: None,
            resolution: None,
            escalated_at: None,
            escalation_reason: None,
            notification_ids: vec![],
        }
    }

    #[test]
    fn acknowledge_allowed_from_new_and_escalated() {
        let mut a = sample_alert(AlertStatus::New);
        assert!(a.acknowledge("u1", Utc::now()).is_ok());
        assert_eq!(a.status, AlertStatus::Acknowledged);

        let mut b = sample_alert(AlertStatus::Escalated);
        assert!(b.acknowledge("u1", Utc::now()).is_ok());
    }

    #[test]
    fn acknowledge_rejected_from_resolved() {
        let mut a = sample_alert(AlertStatus::Resolved);
        assert!(a.acknowledge("u1", Utc::now()).is_err());
    }

    #[test]
    fn resolve_rejected_when_already_resolved() {
        let mut a = sample_alert(AlertStatus::Resolved);
        assert_eq!(
            a.resolve("u1", None, Utc::now()),
            Err(AlertTransitionError::AlreadyResolved)
        );
    }

    #[test]
    fn escalate_rejected_when_resolved() {
        let mut a = sample_alert(AlertStatus::Resolved);
        assert_eq!(
            a.escalate(None, Utc::now()),
            Err(AlertTransitionError::CannotEscalateResolved)
        );
    }

    #[test]
    fn escalate_raises_priority_clamped_to_100() {
        let mut a = sample_alert(AlertStatus::New);
        a.priority = 95;
        a.escalate(Some("no response".into()), Utc::now()).unwrap();
        assert_eq!(a.priority, 100);
        assert_eq!(a.status, AlertStatus::Escalated);
    }
}
