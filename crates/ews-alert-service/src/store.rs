//! Process-local persistence for alerts, subscriptions, and notifications.
//!
//! Structured the way [`ews_store::InMemoryStore`] holds the scoring
//! service's event log: one `RwLock`-guarded map per entity, no external
//! backend. The alert/subscription/notification triad is small and
//! query-light enough that the platform does not carry a second document
//! store for it.

use std::collections::HashMap;

use ews_types::{Alert, Notification, Subscription};
use parking_lot::RwLock;
use uuid::Uuid;

/// In-memory store backing the alert service's command and query handlers.
#[derive(Default)]
pub struct AlertStore {
    alerts: RwLock<HashMap<Uuid, Alert>>,
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl AlertStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an alert.
    pub fn put_alert(&self, alert: Alert) {
        self.alerts.write().insert(alert.alert_id, alert);
    }

    /// Fetch one alert by id.
    pub fn get_alert(&self, alert_id: Uuid) -> Option<Alert> {
        self.alerts.read().get(&alert_id).cloned()
    }

    /// All alerts, most recently observed first.
    pub fn list_alerts(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.alerts.read().values().cloned().collect();
        alerts.sort_by_key(|a| std::cmp::Reverse(a.observed_at));
        alerts
    }

    /// All active subscriptions.
    pub fn active_subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .values()
            .filter(|s| s.active)
            .cloned()
            .collect()
    }

    /// All subscriptions, active or not.
    pub fn list_subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.read().values().cloned().collect()
    }

    /// Insert or replace a subscription.
    pub fn put_subscription(&self, subscription: Subscription) {
        self.subscriptions
            .write()
            .insert(subscription.subscription_id, subscription);
    }

    /// Fetch one subscription by id.
    pub fn get_subscription(&self, subscription_id: Uuid) -> Option<Subscription> {
        self.subscriptions.read().get(&subscription_id).cloned()
    }

    /// Remove a subscription, returning whether one existed.
    pub fn remove_subscription(&self, subscription_id: Uuid) -> bool {
        self.subscriptions.write().remove(&subscription_id).is_some()
    }

    /// Insert or replace a notification.
    pub fn put_notification(&self, notification: Notification) {
        self.notifications
            .write()
            .insert(notification.notification_id, notification);
    }

    /// Fetch one notification by id.
    pub fn get_notification(&self, notification_id: Uuid) -> Option<Notification> {
        self.notifications.read().get(&notification_id).cloned()
    }

    /// Notifications for one alert.
    pub fn notifications_for_alert(&self, alert_id: Uuid) -> Vec<Notification> {
        self.notifications
            .read()
            .values()
            .filter(|n| n.alert_id == alert_id)
            .cloned()
            .collect()
    }

    /// All notifications, most recently created first.
    pub fn list_notifications(&self) -> Vec<Notification> {
        let mut notifications: Vec<Notification> = self.notifications.read().values().cloned().collect();
        notifications.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        notifications
    }
}
