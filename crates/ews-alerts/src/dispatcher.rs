//! C8: Notification Dispatcher — drives [`Notification`] through its
//! delivery state machine via the channel matching its `channelKind`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use ews_types::{ChannelKind, Notification};
use tracing::{error, info};

use crate::channel::DeliveryChannel;
use crate::error::{AlertsError, Result};

/// Routes notifications to the [`DeliveryChannel`] matching their `channelKind`.
pub struct NotificationDispatcher {
    channels: HashMap<ChannelKind, Arc<dyn DeliveryChannel>>,
}

impl NotificationDispatcher {
    /// Build a dispatcher from a set of channel adapters, one per kind.
    pub fn new(channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        Self {
            channels: channels.into_iter().map(|c| (c.kind(), c)).collect(),
        }
    }

    /// Attempt delivery for a PENDING (or re-armed) notification, transitioning
    /// it to SENT or FAILED in place (spec §4.8).
    pub async fn dispatch(&self, notification: &mut Notification) -> Result<()> {
        let Some(channel) = self.channels.get(&notification.channel_kind) else {
            let reason = format!("no adapter registered for {:?}", notification.channel_kind);
            error!(notification_id = %notification.notification_id, reason, "dispatch failed");
            notification.mark_failed(reason.clone());
            return Err(AlertsError::Delivery {
                channel: channel_name(notification.channel_kind),
                reason,
            });
        };

        match channel.send(&notification.recipient, &notification.content).await {
            Ok(()) => {
                notification.mark_sent(Utc::now());
                info!(notification_id = %notification.notification_id, "notification sent");
                Ok(())
            }
            Err(reason) => {
                notification.mark_failed(reason.clone());
                error!(notification_id = %notification.notification_id, reason, "notification delivery failed");
                Err(AlertsError::Delivery {
                    channel: channel_name(notification.channel_kind),
                    reason,
                })
            }
        }
    }

    /// Re-arm a FAILED/PENDING notification and attempt delivery again, keeping
    /// its `notificationId` (spec §4.8 resend rule).
    pub async fn resend(&self, notification: &mut Notification) -> Result<()> {
        notification.resend()?;
        self.dispatch(notification).await
    }
}

fn channel_name(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Email => "email",
        ChannelKind::Sms => "sms",
        ChannelKind::Webhook => "webhook",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ews_types::NotificationStatus;

    struct AlwaysOk;
    #[async_trait::async_trait]
    impl DeliveryChannel for AlwaysOk {
        fn kind(&self) -> ChannelKind {
            ChannelKind::Email
        }
        async fn send(&self, _recipient: &str, _content: &str) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    struct AlwaysFail;
    #[async_trait::async_trait]
    impl DeliveryChannel for AlwaysFail {
        fn kind(&self) -> ChannelKind {
            ChannelKind::Webhook
        }
        async fn send(&self, _recipient: &str, _content: &str) -> std::result::Result<(), String> {
            Err("connection refused".to_string())
        }
    }

    fn notification(kind: ChannelKind) -> Notification {
        Notification::new_pending(uuid::Uuid::new_v4(), "p1", kind, "a@example.com", "body", Utc::now())
    }

    #[tokio::test]
    async fn successful_dispatch_marks_sent() {
        let dispatcher = NotificationDispatcher::new(vec![Arc::new(AlwaysOk)]);
        let mut n = notification(ChannelKind::Email);
        dispatcher.dispatch(&mut n).await.unwrap();
        assert_eq!(n.status, NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn failed_dispatch_marks_failed_with_reason() {
        let dispatcher = NotificationDispatcher::new(vec![Arc::new(AlwaysFail)]);
        let mut n = notification(ChannelKind::Webhook);
        assert!(dispatcher.dispatch(&mut n).await.is_err());
        assert_eq!(n.status, NotificationStatus::Failed);
        assert!(n.error_message.is_some());
    }

    #[tokio::test]
    async fn resend_keeps_id_and_retries_delivery() {
        let dispatcher = NotificationDispatcher::new(vec![Arc::new(AlwaysFail), Arc::new(AlwaysOk)]);
        let mut n = notification(ChannelKind::Webhook);
        dispatcher.dispatch(&mut n).await.ok();
        let id = n.notification_id;
        assert!(dispatcher.resend(&mut n).await.is_err());
        assert_eq!(n.notification_id, id);
        assert_eq!(n.status, NotificationStatus::Failed);
    }

    #[tokio::test]
    async fn missing_channel_adapter_fails_dispatch() {
        let dispatcher = NotificationDispatcher::new(vec![]);
        let mut n = notification(ChannelKind::Sms);
        assert!(dispatcher.dispatch(&mut n).await.is_err());
        assert_eq!(n.status, NotificationStatus::Failed);
    }
}
