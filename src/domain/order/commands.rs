use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::value_objects::{is_valid_cpf, OrderItemType, OrderStatus};

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

pub const MAX_COUPON_LENGTH: usize = 100;

/// Upper bound per line so the order total fits the stored amount column.
pub const MAX_ITEM_QUANTITY: i32 = 1_000;

/// Line of an order submission; only the product reference is trusted,
/// pricing comes from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSubmission {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub item_type: OrderItemType,
}

/// Body of `POST /v1/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub items: Vec<OrderItemSubmission>,
    #[serde(default)]
    pub coupon: Option<String>,
    pub customer_cpf: String,
    pub status: OrderStatus,
}

impl OrderSubmission {
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        for item in &self.items {
            if item.quantity <= 0 || item.quantity > MAX_ITEM_QUANTITY {
                return Err(OrderError::InvalidQuantity(item.quantity));
            }
        }

        if let Some(coupon) = &self.coupon {
            if coupon.chars().count() > MAX_COUPON_LENGTH {
                return Err(OrderError::CouponTooLong { max: MAX_COUPON_LENGTH });
            }
        }

        if !is_valid_cpf(&self.customer_cpf) {
            return Err(OrderError::InvalidCpf(self.customer_cpf.clone()));
        }

        Ok(())
    }
}

/// Body of `PUT /v1/orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusChange {
    pub status: OrderStatus,
}

// ============================================================================
// Unit Tests
// ============================================================================
