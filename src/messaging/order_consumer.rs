use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::domain::order::{OrderError, OrderStatus, OrderStatusEvent, OrderUseCase};
use crate::metrics::Metrics;

use super::subscription::{MessageHandler, Subscription};

// ============================================================================
// Order Event Consumer
// ============================================================================
//
// The "paid" and "ready" listeners share one handler: decode the
// {orderId, status} envelope and hand it to the use case.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    #[error("received empty order event")]
    EmptyPayload,

    #[error("failed to decode order event, error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to update order {order_id} to {status}, error: {source}")]
    Update {
        order_id: i64,
        status: OrderStatus,
        #[source]
        source: OrderError,
    },
}

pub async fn process_order_message(
    use_case: &dyn OrderUseCase,
    payload: &[u8],
) -> Result<OrderStatusEvent, ConsumerError> {
    if payload.is_empty() {
        return Err(ConsumerError::EmptyPayload);
    }

    let event: OrderStatusEvent = serde_json::from_slice(payload)?;

    use_case
        .update_order_status(event.order_id, event.status)
        .await
        .map_err(|source| ConsumerError::Update {
            order_id: event.order_id,
            status: event.status,
            source,
        })?;

    Ok(event)
}

struct OrderStatusHandler {
    use_case: Arc<dyn OrderUseCase>,
    metrics: Arc<Metrics>,
    topic: String,
}

#[async_trait]
impl MessageHandler for OrderStatusHandler {
    async fn handle(&self, payload: &[u8]) -> anyhow::Result<()> {
        let result = process_order_message(self.use_case.as_ref(), payload).await;
        self.metrics.record_order_event(&self.topic, result.is_ok());

        let event = result?;
        tracing::info!(
            topic = %self.topic,
            order_id = event.order_id,
            status = %event.status,
            "✅ Order event processed"
        );
        Ok(())
    }
}

pub struct OrderEventConsumer {
    use_case: Arc<dyn OrderUseCase>,
    paid: Arc<dyn Subscription>,
    ready: Arc<dyn Subscription>,
    metrics: Arc<Metrics>,
}

impl OrderEventConsumer {
    pub fn new(
        use_case: Arc<dyn OrderUseCase>,
        paid: Arc<dyn Subscription>,
        ready: Arc<dyn Subscription>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            use_case,
            paid,
            ready,
            metrics,
        }
    }

    /// Spawns one independent task per topic; neither is restarted if it exits.
    pub fn start_consumers(&self) -> Vec<JoinHandle<()>> {
        [self.paid.clone(), self.ready.clone()]
            .into_iter()
            .map(|subscription| {
                let handler: Arc<dyn MessageHandler> = Arc::new(OrderStatusHandler {
                    use_case: self.use_case.clone(),
                    metrics: self.metrics.clone(),
                    topic: subscription.topic().to_string(),
                });

                tracing::info!(topic = %subscription.topic(), "🚀 Starting order event consumer");
                tokio::spawn(async move { subscription.start(handler).await })
            })
            .collect()
    }
}
