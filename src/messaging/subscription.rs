use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use rdkafka::{
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
    message::Message,
};

use super::error::BrokerError;

// ============================================================================
// Subscriptions - long-lived topic listeners
// ============================================================================
//
// A subscription hands every received payload to its handler. Handler and
// receive failures are logged and the loop moves on to the next message;
// redelivery policy belongs to the broker.
//
// ============================================================================

#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait Subscription: Send + Sync {
    fn topic(&self) -> &str;

    /// Runs for the lifetime of the process.
    async fn start(&self, handler: Arc<dyn MessageHandler>);
}

pub struct RedpandaSubscription {
    consumer: StreamConsumer,
    topic: String,
}

impl RedpandaSubscription {
    pub fn new(brokers: &str, group_id: &str, topic: &str) -> Result<Self, BrokerError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .create()
            .map_err(BrokerError::Client)?;

        consumer
            .subscribe(&[topic])
            .map_err(|source| BrokerError::Subscribe {
                topic: topic.to_string(),
                source,
            })?;

        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl Subscription for RedpandaSubscription {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn start(&self, handler: Arc<dyn MessageHandler>) {
        tracing::info!(topic = %self.topic, "📥 Listening for messages");

        let mut messages = self.consumer.stream();

        while let Some(received) = messages.next().await {
            let payload = match received {
                Ok(message) => {
                    tracing::debug!(
                        topic = %self.topic,
                        partition = message.partition(),
                        offset = message.offset(),
                        "Message received"
                    );
                    message.payload().map(<[u8]>::to_vec).unwrap_or_default()
                }
                Err(e) => {
                    tracing::warn!(topic = %self.topic, error = %e, "Failed to receive message");
                    continue;
                }
            };

            if let Err(e) = handler.handle(&payload).await {
                tracing::error!(topic = %self.topic, error = %e, "Message handler failed");
            }
        }

        tracing::warn!(topic = %self.topic, "Message stream ended");
    }
}
