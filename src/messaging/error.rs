use rdkafka::error::KafkaError;

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("failed to create broker client, error: {0}")]
    Client(#[source] KafkaError),

    #[error("failed to subscribe to {topic}, error: {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: KafkaError,
    },

    #[error("failed to publish to {topic}, error: {source}")]
    Publish {
        topic: String,
        #[source]
        source: KafkaError,
    },
}
