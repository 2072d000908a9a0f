use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::order::ProductionOrder;

use super::error::BrokerError;
use super::redpanda::Publisher;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to encode production order, error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to notify production of order {order_id}, error: {source}")]
    Publish {
        order_id: i64,
        #[source]
        source: BrokerError,
    },
}

/// Hands paid orders over to the kitchen.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn notify_production(&self, order: &ProductionOrder) -> Result<(), NotifyError>;
}

pub struct BrokerOrderNotifier {
    publisher: Arc<dyn Publisher>,
    destination: String,
}

impl BrokerOrderNotifier {
    pub fn new(publisher: Arc<dyn Publisher>, destination: impl Into<String>) -> Self {
        Self {
            publisher,
            destination: destination.into(),
        }
    }
}

#[async_trait]
impl OrderNotifier for BrokerOrderNotifier {
    async fn notify_production(&self, order: &ProductionOrder) -> Result<(), NotifyError> {
        let payload = serde_json::to_vec(order)?;

        self.publisher
            .publish(&self.destination, &order.id.to_string(), &payload)
            .await
            .map_err(|source| NotifyError::Publish {
                order_id: order.id,
                source,
            })?;

        tracing::info!(order_id = order.id, topic = %self.destination, "✅ Production notified");
        Ok(())
    }
}
