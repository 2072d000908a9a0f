use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::domain::pagination::{Page, PageParams};
use crate::domain::product::ProductCatalog;
use crate::gateways::{Authorizer, PaymentGateway, PaymentRequest};
use crate::messaging::OrderNotifier;
use crate::metrics::Metrics;
use crate::store::{OrderRepository, StoreError};

use super::commands::OrderSubmission;
use super::errors::OrderError;
use super::events::ProductionOrder;
use super::value_objects::{Order, OrderItem, OrderStatus, ProductSnapshot};

// ============================================================================
// Order Use Case
// ============================================================================
//
// Orchestrates: Authorize → Price → Persist → Payment QR
//           and Status write → (PAID) Re-fetch → Notify production
//
// Every step short-circuits on failure. A persisted order is not removed when
// the payment call fails, and a status write is not reverted when the
// production notification fails.
//
// ============================================================================

/// Response of a successful order placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub qr_code: String,
    pub order_id: i64,
}

#[async_trait]
pub trait OrderUseCase: Send + Sync {
    async fn get_all_orders(&self, page: PageParams) -> Result<Page<Order>, OrderError>;

    async fn get_order_status(&self, order_id: i64) -> Result<OrderStatus, OrderError>;

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<(), OrderError>;

    async fn create_order(&self, submission: OrderSubmission) -> Result<OrderCreated, OrderError>;
}

pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    catalog: Arc<dyn ProductCatalog>,
    authorizer: Arc<dyn Authorizer>,
    payment: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn OrderNotifier>,
    metrics: Arc<Metrics>,
}

impl OrderService {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        catalog: Arc<dyn ProductCatalog>,
        authorizer: Arc<dyn Authorizer>,
        payment: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn OrderNotifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            catalog,
            authorizer,
            payment,
            notifier,
            metrics,
        }
    }

    async fn place_order(&self, submission: OrderSubmission) -> Result<OrderCreated, OrderError> {
        self.authorizer
            .authorize_user(&submission.customer_cpf)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to authorize customer"))?;

        let items = self.price_items(&submission).await?;

        let mut order = Order {
            id: 0,
            total_amount: Order::compute_total(&items),
            items,
            coupon: submission.coupon,
            status: submission.status,
            created_at: Utc::now(),
            customer_cpf: submission.customer_cpf,
        };

        order.id = self
            .repository
            .save_order(&order)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to save order"))?;

        let qr_code = self
            .payment
            .generate_payment_qr_code(&PaymentRequest::from_order(&order))
            .await
            .inspect_err(|e| {
                tracing::error!(order_id = order.id, error = %e, "failed to generate payment QR code")
            })?;

        tracing::info!(
            order_id = order.id,
            total_amount = %order.total_amount,
            item_count = order.items.len(),
            "✅ Order placed, awaiting payment"
        );

        Ok(OrderCreated {
            qr_code: qr_code.qr_code,
            order_id: order.id,
        })
    }

    /// Resolves every line against the catalog; one missing product fails the whole order.
    async fn price_items(&self, submission: &OrderSubmission) -> Result<Vec<OrderItem>, OrderError> {
        let mut items = Vec::with_capacity(submission.items.len());

        for item in &submission.items {
            let product = self
                .catalog
                .get_product_by_id(item.product_id)
                .await
                .map_err(|source| {
                    tracing::error!(product_id = item.product_id, error = %source, "failed to get product");
                    OrderError::ProductLookup {
                        product_id: item.product_id,
                        source,
                    }
                })?;

            items.push(OrderItem {
                id: 0,
                quantity: item.quantity,
                item_type: item.item_type,
                product: ProductSnapshot::from(&product),
            });
        }

        Ok(items)
    }

    async fn notify_production(&self, order_id: i64) -> Result<(), OrderError> {
        let order = self
            .repository
            .find_order_by_id(order_id)
            .await
            .map_err(|e| not_found_or(order_id, e))
            .inspect_err(|e| tracing::error!(order_id, error = %e, "failed to get order"))?;

        let result = self
            .notifier
            .notify_production(&ProductionOrder::from_order(&order))
            .await;
        self.metrics.record_production_notification(result.is_ok());

        result.inspect_err(|e| tracing::error!(order_id, error = %e, "failed to notify production"))?;
        Ok(())
    }
}

#[async_trait]
impl OrderUseCase for OrderService {
    async fn get_all_orders(&self, page: PageParams) -> Result<Page<Order>, OrderError> {
        let orders = self
            .repository
            .find_all_orders(&page)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to get all orders"))?;

        Ok(Page::build(orders, page))
    }

    async fn get_order_status(&self, order_id: i64) -> Result<OrderStatus, OrderError> {
        let status = self
            .repository
            .get_order_status(order_id)
            .await
            .inspect_err(|e| tracing::error!(order_id, error = %e, "failed to get order status"))?;

        Ok(status)
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<(), OrderError> {
        self.repository
            .update_order_status(order_id, status)
            .await
            .map_err(|e| not_found_or(order_id, e))
            .inspect_err(|e| tracing::error!(order_id, status = %status, error = %e, "failed to update order status"))?;

        self.metrics.record_status_update(status);
        tracing::info!(order_id, status = %status, "Order status updated");

        if status != OrderStatus::Paid {
            return Ok(());
        }

        self.notify_production(order_id).await
    }

    async fn create_order(&self, submission: OrderSubmission) -> Result<OrderCreated, OrderError> {
        let started = Instant::now();

        let result = self.place_order(submission).await;

        match &result {
            Ok(_) => self.metrics.record_order_created(started.elapsed().as_secs_f64()),
            Err(e) => self.metrics.record_order_creation_failure(failure_stage(e)),
        }

        result
    }
}

fn not_found_or(order_id: i64, err: StoreError) -> OrderError {
    match err {
        StoreError::NotFound => OrderError::NotFound(order_id),
        other => OrderError::Store(other),
    }
}

fn failure_stage(err: &OrderError) -> &'static str {
    match err {
        OrderError::Unauthorized => "authorization",
        OrderError::ProductLookup { .. } => "pricing",
        OrderError::Store(_) => "persistence",
        OrderError::Gateway(_) => "payment",
        _ => "other",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
