// ============================================================================
// Messaging - Redpanda / Kafka producer and topic consumers
// ============================================================================

pub mod error;
mod order_consumer;
mod order_notify;
pub mod redpanda;
pub mod subscription;

pub use order_consumer::OrderEventConsumer;
pub use order_notify::{BrokerOrderNotifier, NotifyError, OrderNotifier};
pub use redpanda::RedpandaClient;
pub use subscription::RedpandaSubscription;
