//! # EWS Alert Dispatch Service
//!
//! Reacts to `ews.consensus` by classifying, prioritising, matching
//! subscriptions, and dispatching notifications; also serves the direct
//! alert/subscription/notification HTTP API.

use std::sync::Arc;

use ews_alerts::{DeliveryChannel, EmailChannel, NotificationDispatcher, SmsChannel, WebhookChannel};
use ews_alert_service::{router, AlertConfig, AlertStore, AppState};
use ews_bus::{AmqpBus, EventBus, InMemoryBus};
use ews_support::health::ComponentHealth;
use ews_support::HealthState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: AlertConfig = ews_support::load(Some("alert"))?;

    ews_support::init_logging(&config.logging.level, config.logging.format == "json");

    tracing::info!(
        addr = %config.http.addr,
        use_broker = config.bus.use_broker,
        smtp_enabled = config.smtp.enabled,
        "starting ews-alert-service"
    );

    let bus: Arc<dyn EventBus> = if config.bus.use_broker {
        Arc::new(AmqpBus::connect(&config.bus.amqp_url).await?)
    } else {
        Arc::new(InMemoryBus::new())
    };

    let mut channels: Vec<Arc<dyn DeliveryChannel>> = vec![
        Arc::new(WebhookChannel::default()),
        Arc::new(SmsChannel),
    ];
    if config.smtp.enabled {
        let email = EmailChannel::new(
            &config.smtp.relay,
            &config.smtp.username,
            &config.smtp.password,
            config.smtp.from.clone(),
        )?;
        channels.push(Arc::new(email));
    } else {
        tracing::warn!("SMTP disabled: email notifications will fail with no adapter registered");
    }

    let health = HealthState::new();
    health.set_component("event_bus", ComponentHealth::up());
    health.set_startup_complete(true);
    health.set_ready(true);

    let state = AppState {
        store: Arc::new(AlertStore::new()),
        dispatcher: Arc::new(NotificationDispatcher::new(channels)),
        bus,
        health,
    };

    tokio::spawn(ews_alert_service::consumer::run(state.clone()));

    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.http.addr).await?;
    tracing::info!(addr = %config.http.addr, "ews-alert-service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
