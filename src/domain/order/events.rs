use serde::{Deserialize, Serialize};

use super::value_objects::{Order, OrderItemType, OrderStatus};

// ============================================================================
// Order Events - Broker payloads
// ============================================================================

/// Inbound status change received on the "paid" and "ready" topics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusEvent {
    pub order_id: i64,
    pub status: OrderStatus,
}

/// Notification sent to the kitchen once an order is paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: i64,
    pub status: OrderStatus,
    pub items: Vec<ProductionOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrderItem {
    pub quantity: i32,
    #[serde(rename = "type")]
    pub item_type: OrderItemType,
    pub product: ProductionProduct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionProduct {
    pub name: String,
    pub description: String,
    pub category: String,
}

impl ProductionOrder {
    /// Production always receives the order as IN_PROGRESS, whatever the
    /// stored status is.
    pub const STATUS: OrderStatus = OrderStatus::InProgress;

    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id,
            status: Self::STATUS,
            items: order
                .items
                .iter()
                .map(|item| ProductionOrderItem {
                    quantity: item.quantity,
                    item_type: item.item_type,
                    product: ProductionProduct {
                        name: item.product.name.clone(),
                        description: item.product.description.clone(),
                        category: item.product.category.clone(),
                    },
                })
                .collect(),
        }
    }
}
