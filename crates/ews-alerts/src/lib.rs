//! # EWS Alerts
//!
//! Alert prioritisation and subscription matching (C7), and the notification
//! delivery state machine (C8).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod classifier;
mod dispatcher;
mod error;
mod matcher;

pub use channel::{DeliveryChannel, EmailChannel, SmsChannel, WebhookChannel};
pub use classifier::{classify, priority};
pub use dispatcher::NotificationDispatcher;
pub use error::{AlertsError, Result};
pub use matcher::{escalation_subscriptions, matching_subscriptions};
