//! # EWS Ingestion Service
//!
//! Edge-facing entry point: receives sensor readings, runs C2 sensor
//! consensus and C4 completeness detection, and — once a vital vector
//! completes — runs C1 NEWS2 scoring and publishes the resulting
//! `ScoreEvent` onto the event bus for the scoring service to consense over.

use std::sync::Arc;

use ews_bus::{AmqpBus, EventBus, InMemoryBus};
use ews_consensus::{CompletenessDetector, SensorConsensusEngine};
use ews_ingestion::store::SensorConsensusStore;
use ews_ingestion::{router, AppState, IngestionConfig};
use ews_support::health::ComponentHealth;
use ews_support::HealthState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: IngestionConfig = ews_support::load(Some("ingestion"))?;

    ews_support::init_logging(&config.logging.level, config.logging.format == "json");

    tracing::info!(
        addr = %config.http.addr,
        node_id = %config.node_id,
        use_broker = config.bus.use_broker,
        "starting ews-ingestion"
    );

    let bus: Arc<dyn EventBus> = if config.bus.use_broker {
        Arc::new(AmqpBus::connect(&config.bus.amqp_url).await?)
    } else {
        Arc::new(InMemoryBus::new())
    };

    let health = HealthState::new();
    health.set_component("event_bus", ComponentHealth::up());
    health.set_startup_complete(true);
    health.set_ready(true);

    let state = AppState {
        sensor_consensus: Arc::new(SensorConsensusEngine::new()),
        completeness: Arc::new(CompletenessDetector::new()),
        consensus_history: Arc::new(SensorConsensusStore::new()),
        bus,
        node_id: config.node_id.clone(),
        health,
    };

    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.http.addr).await?;
    tracing::info!(addr = %config.http.addr, "ews-ingestion listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
