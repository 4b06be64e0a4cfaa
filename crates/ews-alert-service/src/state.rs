//! Shared application state for the alert service's axum handlers and bus consumer.

use std::sync::Arc;

use ews_alerts::NotificationDispatcher;
use ews_bus::EventBus;
use ews_support::HealthState;

use crate::store::AlertStore;

/// Handle passed into every request handler via axum's `State` extractor, and
/// into the background bus-consumer task.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AlertStore>,
    /// C8: routes notifications to the channel matching their `channelKind`.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// C6: consumes `ews.consensus`.
    pub bus: Arc<dyn EventBus>,
    pub health: HealthState,
}
