use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::ProductError;

// ============================================================================
// Product Value Objects
// ============================================================================

pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Catalog entry, the authoritative source of unit prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku_id: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of product create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub sku_id: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: Decimal,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(ProductError::EmptyCategory);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ProductError::DescriptionTooLong { max: MAX_DESCRIPTION_LENGTH });
        }
        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.price));
        }
        Ok(())
    }
}
