//! C7's subscription-matching query: given an [`Alert`], which active
//! [`Subscription`]s should receive it (spec §4.7).

use ews_types::{Alert, AlertSeverity, Subscription, SubscriberType};

/// Return the subset of `subscriptions` that should be notified about `alert`.
pub fn matching_subscriptions<'a>(
    alert: &Alert,
    subscriptions: &'a [Subscription],
) -> Vec<&'a Subscription> {
    subscriptions
        .iter()
        .filter(|s| s.matches(&alert.patient_id, alert.alert_type, alert.alert_severity))
        .collect()
}

/// The narrower escalation-tier query (spec §4.7): department-level
/// subscriptions with `minSeverity = HIGH`, matching this alert's patient or
/// global — used instead of [`matching_subscriptions`] when an alert escalates.
pub fn escalation_subscriptions<'a>(
    alert: &Alert,
    subscriptions: &'a [Subscription],
) -> Vec<&'a Subscription> {
    subscriptions
        .iter()
        .filter(|s| s.active)
        .filter(|s| s.subscriber_type == SubscriberType::Department)
        .filter(|s| s.min_severity == AlertSeverity::High)
        .filter(|s| s.patient_id.as_deref().map_or(true, |pid| pid == alert.patient_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ews_types::{AlertSeverity, AlertStatus, AlertType, Channel, ChannelKind, SubscriberType};
    use uuid::Uuid;

    fn alert() -> Alert {
        Alert {
            alert_id: Uuid::new_v4(),
            patient_id: "p1".into(),
            source_service: "scoring".into(),
            alert_type: AlertType::EwsCritical,
            alert_severity: AlertSeverity::High,
            message: "critical".into(),
            observed_at: chrono::Utc::now(),
            sensor_data: None,
            ews_data: None,
            status: AlertStatus::New,
            priority: 100,
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

    fn subscription(patient_id: Option<&str>, min_severity: AlertSeverity) -> Subscription {
        Subscription {
            subscription_id: Uuid::new_v4(),
            subscriber_type: SubscriberType::Staff,
            subscriber_id: "staff-1".into(),
            patient_id: patient_id.map(str::to_string),
            alert_types: vec![],
            min_severity,
            channels: vec![Channel {
                kind: ChannelKind::Email,
                contact: "a@example.com".into(),
                enabled: true,
            }],
            active: true,
        }
    }

    /// Scenario S6: a broad subscription matches, a narrow one does not.
    #[test]
    fn s6_broad_subscription_matches_narrow_does_not() {
        let broad = subscription(None, AlertSeverity::Low);
        let mut narrow = subscription(None, AlertSeverity::High);
        narrow.alert_types = vec![AlertType::EwsUrgent];

        let subs = vec![broad, narrow];
        let matched = matching_subscriptions(&alert(), &subs);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].min_severity, AlertSeverity::Low);
    }

    #[test]
    fn patient_scoped_subscriptions_excluded_for_other_patients() {
        let subs = vec![subscription(Some("other-patient"), AlertSeverity::Low)];
        assert!(matching_subscriptions(&alert(), &subs).is_empty());
    }
}
