use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord},
    util::Timeout,
};

use super::error::BrokerError;

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget delivery of an encoded payload to a named destination.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, destination: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError>;
}

pub struct RedpandaClient {
    producer: FutureProducer,
}

impl RedpandaClient {
    pub fn new(brokers: &str) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", MESSAGE_TIMEOUT.as_millis().to_string())
            .create()
            .map_err(BrokerError::Client)?;

        Ok(Self { producer })
    }
}

#[async_trait]
impl Publisher for RedpandaClient {
    async fn publish(&self, destination: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError> {
        let record = FutureRecord::to(destination).key(key).payload(payload);

        match self.producer.send(record, Timeout::After(MESSAGE_TIMEOUT)).await {
            Ok(_) => {
                tracing::info!(
                    topic = %destination,
                    key = %key,
                    "Published to Redpanda"
                );
                Ok(())
            }
            Err((e, _)) => {
                tracing::error!(
                    error = %e,
                    topic = %destination,
                    "Failed to publish to Redpanda"
                );
                Err(BrokerError::Publish {
                    topic: destination.to_string(),
                    source: e,
                })
            }
        }
    }
}
