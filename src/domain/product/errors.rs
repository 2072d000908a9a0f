use rust_decimal::Decimal;

use crate::store::StoreError;

// ============================================================================
// Product Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("product name cannot be empty")]
    EmptyName,

    #[error("product category cannot be empty")]
    EmptyCategory,

    #[error("description length should be at most {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("product price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error("product not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProductError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProductError::EmptyName
                | ProductError::EmptyCategory
                | ProductError::DescriptionTooLong { .. }
                | ProductError::NegativePrice(_)
        )
    }
}
