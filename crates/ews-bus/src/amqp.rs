//! `lapin`-backed [`EventBus`] over a durable topic exchange.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use tracing::{info, warn};

use crate::envelope::{BusMessage, EXCHANGE_NAME};
use crate::error::Result;
use crate::traits::EventBus;

/// An [`EventBus`] backed by a RabbitMQ (or any AMQP 0-9-1 broker) connection.
pub struct AmqpBus {
    channel: Channel,
}

impl AmqpBus {
    /// Connect to `uri` and declare the shared [`EXCHANGE_NAME`] topic exchange.
    pub async fn connect(uri: &str) -> Result<Self> {
        let connection = Connection::connect(uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                EXCHANGE_NAME,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        info!(exchange = EXCHANGE_NAME, "declared event-bus exchange");
        Ok(Self { channel })
    }
}

#[async_trait]
impl EventBus for AmqpBus {
    async fn publish(&self, routing_key: &str, payload: serde_json::Value) -> Result<()> {
        let envelope = BusMessage::new(routing_key, payload);
        let body = serde_json::to_vec(&envelope)?;
        self.channel
            .basic_publish(
                EXCHANGE_NAME,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }

    async fn subscribe(
        &self,
        queue_name: &str,
        routing_key: &str,
    ) -> Result<BoxStream<'static, BusMessage>> {
        self.channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        self.channel
            .queue_bind(
                queue_name,
                EXCHANGE_NAME,
                routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;
        let consumer = self
            .channel
            .basic_consume(
                queue_name,
                &format!("{queue_name}-consumer"),
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        let stream = consumer.filter_map(|delivery| async move {
            let delivery = match delivery {
                Ok(d) => d,
                Err(err) => {
                    warn!(%err, "dropped malformed AMQP delivery");
                    return None;
                }
            };
            let message: BusMessage = match serde_json::from_slice(&delivery.data) {
                Ok(m) => m,
                Err(err) => {
                    warn!(%err, "dropped envelope that failed to deserialize");
                    let _ = delivery.ack(Default::default()).await;
                    return None;
                }
            };
            let _ = delivery.ack(Default::default()).await;
            Some(message)
        });

        Ok(Box::pin(stream))
    }
}
