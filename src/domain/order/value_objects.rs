use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Lifecycle state of an order.
///
/// Any value may overwrite any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Paid,
    Received,
    InProgress,
    Expired,
    Ready,
    Done,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Created,
        OrderStatus::Paid,
        OrderStatus::Received,
        OrderStatus::InProgress,
        OrderStatus::Expired,
        OrderStatus::Ready,
        OrderStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Received => "RECEIVED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Ready => "READY",
            OrderStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
    }
}

/// Composition of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemType {
    Unit,
    Combo,
    CustomCombo,
}

impl OrderItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderItemType::Unit => "UNIT",
            OrderItemType::Combo => "COMBO",
            OrderItemType::CustomCombo => "CUSTOM_COMBO",
        }
    }
}

impl FromStr for OrderItemType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNIT" => Ok(OrderItemType::Unit),
            "COMBO" => Ok(OrderItemType::Combo),
            "CUSTOM_COMBO" => Ok(OrderItemType::CustomCombo),
            other => Err(OrderError::InvalidItemType(other.to_string())),
        }
    }
}

/// Denormalized copy of the catalog product taken when the order is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub sku_id: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            sku_id: product.sku_id.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Line id, zero until persisted
    pub id: i64,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub item_type: OrderItemType,
    pub product: ProductSnapshot,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Assigned by the store, zero until persisted
    pub id: i64,
    pub items: Vec<OrderItem>,
    pub coupon: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub customer_cpf: String,
}

impl Order {
    /// Sum of unit price × quantity over every line.
    pub fn compute_total(items: &[OrderItem]) -> Decimal {
        items.iter().map(OrderItem::subtotal).sum()
    }
}

// ============================================================================
// Customer CPF
// ============================================================================

/// Brazilian individual tax id, checked with the two mod-11 verifier digits.
pub fn is_valid_cpf(raw: &str) -> bool {
    let cpf: String = raw.chars().filter(|c| *c != '.' && *c != '-').collect();

    if cpf.len() != 11 || !cpf.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check_digit = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };

    check_digit(9) == digits[9] && check_digit(10) == digits[10]
}

// ============================================================================
// Unit Tests
// ============================================================================
