//! # EWS Scoring & Event-Sourced Score-Consensus Service
//!
//! Reconciles per-node score events into consensus, persists the event log
//! and projected read model, and publishes consensus records for the alert
//! service.

use std::sync::Arc;

use ews_bus::{AmqpBus, EventBus, InMemoryBus};
use ews_consensus::ScoreConsensusEngine;
use ews_scoring_service::{router, AppState, ScoringConfig};
use ews_store::{InMemoryStore, MongoConfig, MongoStore, ReadModelProjector, ReadModelStore};
use ews_support::health::ComponentHealth;
use ews_support::HealthState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: ScoringConfig = ews_support::load(Some("scoring"))?;

    ews_support::init_logging(&config.logging.level, config.logging.format == "json");

    tracing::info!(
        addr = %config.http.addr,
        use_broker = config.bus.use_broker,
        use_mongo = config.store.use_mongo,
        "starting ews-scoring-service"
    );

    let bus: Arc<dyn EventBus> = if config.bus.use_broker {
        Arc::new(AmqpBus::connect(&config.bus.amqp_url).await?)
    } else {
        Arc::new(InMemoryBus::new())
    };

    // Both the event log and the read-model projection live on the same
    // backend instance; each handle below is an unsized coercion of the same
    // underlying `Arc`, not a second store.
    let (event_store, read_store): (Arc<dyn ews_store::EventStore>, Arc<dyn ReadModelStore>) =
        if config.store.use_mongo {
            let mongo = Arc::new(
                MongoStore::connect(&MongoConfig {
                    uri: config.store.mongo_uri.clone(),
                    database: config.store.mongo_database.clone(),
                })
                .await?,
            );
            (mongo.clone(), mongo)
        } else {
            let memory = Arc::new(InMemoryStore::new());
            (memory.clone(), memory)
        };

    let health = HealthState::new();
    health.set_component("event_bus", ComponentHealth::up());
    health.set_component("store", ComponentHealth::up());
    health.set_startup_complete(true);
    health.set_ready(true);

    let state = AppState {
        score_consensus: Arc::new(ScoreConsensusEngine::new()),
        event_store,
        projector: Arc::new(ReadModelProjector::new(read_store.clone())),
        read_store,
        bus,
        health,
    };

    tokio::spawn(ews_scoring_service::consumer::run(state.clone()));

    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.http.addr).await?;
    tracing::info!(addr = %config.http.addr, "ews-scoring-service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
