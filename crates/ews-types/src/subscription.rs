//! Subscriptions — routing rules consumed by C7's matcher (spec §3).

use crate::alert::{AlertSeverity, AlertType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a subscription is registered on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriberType {
    Staff,
    Department,
    PatientRelative,
}

/// Delivery channel kind, matching the transports the platform has adapters for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Sms,
    Webhook,
}

/// One delivery channel on a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub kind: ChannelKind,
    pub contact: String,
    pub enabled: bool,
}

/// A routing rule: which alerts go to which recipient over which channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: Uuid,
    pub subscriber_type: SubscriberType,
    pub subscriber_id: String,
    /// `None` = matches any patient.
    pub patient_id: Option<String>,
    /// Empty = matches all alert types.
    pub alert_types: Vec<AlertType>,
    pub min_severity: AlertSeverity,
    /// Invariant: at least one channel.
    pub channels: Vec<Channel>,
    pub active: bool,
}

impl Subscription {
    /// The matching rule of spec §4.7.
    pub fn matches(&self, patient_id: &str, alert_type: AlertType, severity: AlertSeverity) -> bool {
        if !self.active {
            return false;
        }
        if let Some(ref pid) = self.patient_id {
            if pid != patient_id {
                return false;
            }
        }
        if !severity_satisfies(severity, self.min_severity) {
            return false;
        }
        if !self.alert_types.is_empty() && !self.alert_types.contains(&alert_type) {
            return false;
        }
        true
    }
}

/// Severity rule of spec §4.7: `HIGH` matches any subscription; `MEDIUM` matches
/// subscriptions with `minSeverity` in {MEDIUM, LOW}; `LOW` matches only `minSeverity = LOW`.
fn severity_satisfies(alert_severity: AlertSeverity, min_severity: AlertSeverity) -> bool {
    match alert_severity {
        AlertSeverity::High => true,
        AlertSeverity::Medium => matches!(min_severity, AlertSeverity::Medium | AlertSeverity::Low),
        AlertSeverity::Low => min_severity == AlertSeverity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(patient_id: Option<&str>, min_severity: AlertSeverity, types: Vec<AlertType>) -> Subscription {
        Subscription {
            subscription_id: Uuid::new_v4(),
            subscriber_type: SubscriberType::Staff,
            subscriber_id: "staff-1".into(),
            patient_id: patient_id.map(|s| s.to_string()),
            alert_types: types,
            min_severity,
            channels: vec![Channel {
                kind: ChannelKind::Email,
                contact: "a@example.com".into(),
                enabled: true,
            }],
            active: true,
        }
    }

    #[test]
    fn s6_only_staff_low_min_severity_matches_critical_alert() {
        let broad = sub(None, AlertSeverity::Low, vec![]);
        let narrow = sub(None, AlertSeverity::High, vec![AlertType::EwsUrgent]);

        assert!(broad.matches("p1", AlertType::EwsCritical, AlertSeverity::High));
        assert!(!narrow.matches("p1", AlertType::EwsCritical, AlertSeverity::High));
    }

    #[test]
    fn inactive_subscription_never_matches() {
        let mut s = sub(None, AlertSeverity::Low, vec![]);
        s.active = false;
        assert!(!s.matches("p1", AlertType::EwsCritical, AlertSeverity::High));
    }

    #[test]
    fn patient_scoped_subscription_ignores_other_patients() {
        let s = sub(Some("p1"), AlertSeverity::Low, vec![]);
        assert!(s.matches("p1", AlertType::EwsUrgent, AlertSeverity::Medium));
        assert!(!s.matches("p2", AlertType::EwsUrgent, AlertSeverity::Medium));
    }

    #[test]
    fn medium_severity_subscription_rejects_low_alert() {
        let s = sub(None, AlertSeverity::Medium, vec![]);
        assert!(!s.matches("p1", AlertType::EwsElevated, AlertSeverity::Low));
        assert!(s.matches("p1", AlertType::EwsUrgent, AlertSeverity::Medium));
    }
}
