use crate::domain::product::ProductError;
use crate::gateways::GatewayError;
use crate::messaging::NotifyError;
use crate::store::StoreError;

// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("order items cannot be empty")]
    EmptyItems,

    #[error("invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("invalid item type: {0}")]
    InvalidItemType(String),

    #[error("invalid CPF [{0}]")]
    InvalidCpf(String),

    #[error("coupon length should be at most {max} characters")]
    CouponTooLong { max: usize },

    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    #[error("customer unauthorized")]
    Unauthorized,

    #[error("order not found: {0}")]
    NotFound(i64),

    #[error("failed to find product [{product_id}], error: {source}")]
    ProductLookup {
        product_id: i64,
        #[source]
        source: ProductError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gateway(GatewayError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl OrderError {
    /// Errors caused by the shape of the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OrderError::EmptyItems
                | OrderError::InvalidQuantity(_)
                | OrderError::InvalidItemType(_)
                | OrderError::InvalidCpf(_)
                | OrderError::CouponTooLong { .. }
                | OrderError::InvalidStatus(_)
        )
    }
}

impl From<GatewayError> for OrderError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => OrderError::Unauthorized,
            other => OrderError::Gateway(other),
        }
    }
}
