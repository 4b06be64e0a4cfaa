//! Alert-lifecycle, notification-dispatch, and channel-delivery errors.

use ews_types::{AlertTransitionError, NotificationTransitionError};
use thiserror::Error;

/// Errors raised by the alert prioritiser (C7) and notification dispatcher (C8).
#[derive(Debug, Error)]
pub enum AlertsError {
    /// An alert status transition was attempted that its state machine forbids.
    #[error("invalid alert transition: {0}")]
    AlertTransition(#[from] AlertTransitionError),

    /// A notification status transition was attempted that its state machine forbids.
    #[error("invalid notification transition: {0}")]
    NotificationTransition(#[from] NotificationTransitionError),

    /// A delivery channel failed to send.
    #[error("delivery failed on {channel}: {reason}")]
    Delivery {
        /// Which channel failed (`email`, `sms`, `webhook`).
        channel: &'static str,
        /// The underlying failure reason.
        reason: String,
    },
}

/// Result alias for alert and notification operations.
pub type Result<T> = std::result::Result<T, AlertsError>;
