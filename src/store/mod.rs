// ============================================================================
// Relational Store - PostgreSQL persistence
// ============================================================================
//
// Repositories are traits so the use cases can run against in-memory fakes;
// the Pg* types are the only production implementations.
//
// ============================================================================

mod error;
mod order_store;
mod product_store;

pub use error::StoreError;
pub use order_store::{OrderRepository, PgOrderRepository};
pub use product_store::{PgProductRepository, ProductRepository};
