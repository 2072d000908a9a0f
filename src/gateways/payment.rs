use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::{Order, OrderItemType};

use super::error::GatewayError;
use super::http_client::HttpTransport;

const GATEWAY: &str = "payment gateway";

// ============================================================================
// Payment Gateway - QR code issuing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: i64,
    pub customer_cpf: String,
    pub total_amount: Decimal,
    pub items: Vec<PaymentItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentItemRequest {
    pub quantity: i32,
    pub product: PaymentProductRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProductRequest {
    pub name: String,
    pub sku_id: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub item_type: OrderItemType,
    pub price: Decimal,
}

impl PaymentRequest {
    /// Built from the persisted order, so `order_id` is the store-assigned id.
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            customer_cpf: order.customer_cpf.clone(),
            total_amount: order.total_amount,
            items: order
                .items
                .iter()
                .map(|item| PaymentItemRequest {
                    quantity: item.quantity,
                    product: PaymentProductRequest {
                        name: item.product.name.clone(),
                        sku_id: item.product.sku_id.clone(),
                        description: item.product.description.clone(),
                        category: item.product.category.clone(),
                        item_type: item.item_type,
                        price: item.product.price,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentQrCode {
    #[serde(rename = "qrcode")]
    pub qr_code: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn generate_payment_qr_code(&self, request: &PaymentRequest) -> Result<PaymentQrCode, GatewayError>;
}

pub struct HttpPaymentClient {
    transport: Arc<dyn HttpTransport>,
    url: String,
}

impl HttpPaymentClient {
    pub fn new(transport: Arc<dyn HttpTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentClient {
    async fn generate_payment_qr_code(&self, request: &PaymentRequest) -> Result<PaymentQrCode, GatewayError> {
        let body = serde_json::to_vec(request)
            .map_err(|source| GatewayError::Encode { gateway: GATEWAY, source })?;

        let response = self
            .transport
            .post_json(&self.url, body)
            .await
            .map_err(|source| GatewayError::Transport { gateway: GATEWAY, source })?;

        if !response.is_success() {
            tracing::error!(
                order_id = request.order_id,
                status = response.status,
                "Payment gateway refused order"
            );
            return Err(GatewayError::PaymentFailed { status: response.status });
        }

        serde_json::from_slice(&response.body)
            .map_err(|source| GatewayError::Decode { gateway: GATEWAY, source })
    }
}
