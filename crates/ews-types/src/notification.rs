//! Notification delivery attempts (spec §3, owned by C8).

use crate::subscription::ChannelKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery lifecycle (spec §3): `PENDING -> (SENT -> DELIVERED) | FAILED`.
/// Terminal states `SENT`/`DELIVERED`/`FAILED` may only re-enter `PENDING`
/// via an explicit resend command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
}

/// One delivery attempt record. A `notificationId` identifies a
/// recipient+content pair, not an attempt — resend updates the record in
/// place rather than minting a new id (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: Uuid,
    pub alert_id: Uuid,
    pub patient_id: String,
    pub channel_kind: ChannelKind,
    pub recipient: String,
    pub content: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

/// Errors raised by illegal notification-state transitions.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum NotificationTransitionError {
    #[error("resend is only permitted from FAILED or PENDING, got {0:?}")]
    CannotResend(NotificationStatus),
}

impl Notification {
    /// Create a new PENDING notification.
    pub fn new_pending(
        alert_id: Uuid,
        patient_id: impl Into<String>,
        channel_kind: ChannelKind,
        recipient: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            notification_id: Uuid::new_v4(),
            alert_id,
            patient_id: patient_id.into(),
            channel_kind,
            recipient: recipient.into(),
            content: content.into(),
            status: NotificationStatus::Pending,
            created_at,
            sent_at: None,
            delivered_at: None,
            error_message: None,
        }
    }

    /// Transition to SENT.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.status = NotificationStatus::Sent;
        self.sent_at = Some(at);
        self.error_message = None;
    }

    /// Transition to FAILED with a reason.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = NotificationStatus::Failed;
        self.error_message = Some(error.into());
    }

    /// Transition to DELIVERED. Channels without delivery receipts never call this;
    /// their terminal state stays SENT.
    pub fn mark_delivered(&mut self, at: DateTime<Utc>) {
        self.status = NotificationStatus::Delivered;
        self.delivered_at = Some(at);
    }

    /// Resend: permitted only from FAILED or PENDING. Re-arms the record in place
    /// (same `notificationId`) for a fresh delivery attempt.
    pub fn resend(&mut self) -> Result<(), NotificationTransitionError> {
        if !matches!(
            self.status,
            NotificationStatus::Failed | NotificationStatus::Pending
        ) {
            return Err(NotificationTransitionError::CannotResend(self.status));
        }
        self.status = NotificationStatus::Pending;
        self.sent_at = None;
        self.delivered_at = None;
        self.error_message = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification::new_pending(
            Uuid::new_v4(),
            "p1",
            ChannelKind::Email,
            "a@example.com",
            "body",
            Utc::now(),
        )
    }

    #[test]
    fn lifecycle_pending_to_sent_to_delivered() {
        let mut n = sample();
        assert_eq!(n.status, NotificationStatus::Pending);
        n.mark_sent(Utc::now());
        assert_eq!(n.status, NotificationStatus::Sent);
        n.mark_delivered(Utc::now());
        assert_eq!(n.status, NotificationStatus::Delivered);
    }

    #[test]
    fn resend_allowed_from_failed_and_pending_only() {
        let mut n = sample();
        n.mark_sent(Utc::now());
        n.mark_delivered(Utc::now());
        assert_eq!(
            n.resend(),
            Err(NotificationTransitionError::CannotResend(
                NotificationStatus::Delivered
            ))
        );

        let mut failed = sample();
        failed.mark_failed("smtp timeout");
        assert!(failed.resend().is_ok());
        assert_eq!(failed.status, NotificationStatus::Pending);
    }

    #[test]
    fn resend_keeps_same_notification_id() {
        let mut n = sample();
        let id = n.notification_id;
        n.mark_failed("bounce");
        n.resend().unwrap();
        assert_eq!(n.notification_id, id);
    }
}
