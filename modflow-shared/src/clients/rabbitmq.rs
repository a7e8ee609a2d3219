use lapin::{
    options::{BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind,
};
use serde::Serialize;

use crate::types::Event;

pub const EXCHANGE_NAME: &str = "modflow.events";

const PERSISTENT: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("broker error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error("broker refused message for {routing_key}")]
    Nacked { routing_key: String },
}

/// Publisher on the `modflow.events` topic exchange, with confirms enabled.
#[derive(Clone)]
pub struct RabbitMQClient {
    channel: Channel,
}

impl RabbitMQClient {
    /// Connect, open a confirm-mode channel and declare the exchange.
    /// `connection_name` shows up in the broker's management UI.
    pub async fn connect(url: &str, connection_name: &str) -> Result<Self, lapin::Error> {
        let properties = ConnectionProperties::default().with_connection_name(connection_name.into());
        let conn = Connection::connect(url, properties).await?;
        let channel = conn.create_channel().await?;

        channel.confirm_select(ConfirmSelectOptions::default()).await?;
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

        tracing::info!(exchange = EXCHANGE_NAME, connection = connection_name, "connected to RabbitMQ");
        Ok(Self { channel })
    }

    /// Publish a persistent JSON event and wait for the broker's confirm.
    pub async fn publish<T: Serialize>(
        &self,
        routing_key: &str,
        event: &Event<T>,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event)?;

        let confirmation = self
            .channel
            .basic_publish(
                EXCHANGE_NAME,
                routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_message_id(event.id.to_string().into())
                    .with_delivery_mode(PERSISTENT),
            )
            .await?
            .await?;

        if confirmation.is_nack() {
            return Err(PublishError::Nacked {
                routing_key: routing_key.to_string(),
            });
        }

        tracing::debug!(routing_key = %routing_key, event_id = %event.id, "event published");
        Ok(())
    }

    /// Whether the underlying AMQP channel is still usable.
    pub fn is_connected(&self) -> bool {
        self.channel.status().connected()
    }
}
