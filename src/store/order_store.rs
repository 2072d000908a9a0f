use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Transaction};

use crate::domain::order::{Order, OrderItem, OrderItemType, OrderStatus, ProductSnapshot};
use crate::domain::pagination::PageParams;

use super::error::{column, StoreError};

// ============================================================================
// Order Repository
// ============================================================================
//
// An order row and its item rows are written in one transaction: readers
// never observe an order without its items or items without their order.
//
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all_orders(&self, page: &PageParams) -> Result<Vec<Order>, StoreError>;

    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, StoreError>;

    async fn get_order_status(&self, order_id: i64) -> Result<OrderStatus, StoreError>;

    /// Persist the order and every item atomically, returning the generated id.
    async fn save_order(&self, order: &Order) -> Result<i64, StoreError>;

    /// Zero rows affected yields `StoreError::NotFound`.
    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<(), StoreError>;
}

const FIND_ALL_ORDERS: &str = "SELECT id, coupon, total_amount, customer_cpf, status, created_at \
     FROM orders ORDER BY id LIMIT $1 OFFSET $2";

const FIND_ORDER_BY_ID: &str = "SELECT id, coupon, total_amount, customer_cpf, status, created_at \
     FROM orders WHERE id = $1";

const FIND_ORDER_STATUS: &str = "SELECT status FROM orders WHERE id = $1";

const FIND_ORDER_ITEMS: &str = "SELECT id, quantity, item_type, product_id, product_name, product_sku_id, \
     product_description, product_category, product_price \
     FROM order_items WHERE order_id = $1 ORDER BY id";

const INSERT_ORDER: &str = "INSERT INTO orders (coupon, total_amount, customer_cpf, status, created_at) \
     VALUES ($1, $2, $3, $4, $5) RETURNING id";

const INSERT_ORDER_ITEM: &str = "INSERT INTO order_items (order_id, quantity, item_type, product_id, product_name, \
     product_sku_id, product_description, product_category, product_price) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

const UPDATE_ORDER_STATUS: &str = "UPDATE orders SET status = $2 WHERE id = $1";

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        let rows = sqlx::query(FIND_ORDER_ITEMS)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::query("find order items"))?;

        rows.iter().map(item_from_row).collect()
    }

    async fn insert_order(tx: &mut Transaction<'_, Postgres>, order: &Order) -> Result<i64, StoreError> {
        let order_id: i64 = sqlx::query_scalar(INSERT_ORDER)
            .bind(order.coupon.as_deref())
            .bind(order.total_amount)
            .bind(&order.customer_cpf)
            .bind(order.status.as_str())
            .bind(order.created_at)
            .fetch_one(&mut **tx)
            .await
            .map_err(StoreError::query("save order"))?;

        for item in &order.items {
            sqlx::query(INSERT_ORDER_ITEM)
                .bind(order_id)
                .bind(item.quantity)
                .bind(item.item_type.as_str())
                .bind(item.product.id)
                .bind(&item.product.name)
                .bind(&item.product.sku_id)
                .bind(&item.product.description)
                .bind(&item.product.category)
                .bind(item.product.price)
                .execute(&mut **tx)
                .await
                .map_err(StoreError::query("save order items associations"))?;
        }

        Ok(order_id)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_all_orders(&self, page: &PageParams) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(FIND_ALL_ORDERS)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::query("find all orders"))?;

        let mut orders = rows.iter().map(order_from_row).collect::<Result<Vec<_>, _>>()?;

        for order in &mut orders {
            order.items = self.find_order_items(order.id).await?;
        }

        Ok(orders)
    }

    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, StoreError> {
        let row = sqlx::query(FIND_ORDER_BY_ID)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::query("find order by id"))?
            .ok_or(StoreError::NotFound)?;

        let mut order = order_from_row(&row)?;
        order.items = self.find_order_items(order.id).await?;
        Ok(order)
    }

    async fn get_order_status(&self, order_id: i64) -> Result<OrderStatus, StoreError> {
        // A missing row surfaces as a generic query failure
        let status: String = sqlx::query_scalar(FIND_ORDER_STATUS)
            .bind(order_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::query("find order status"))?;

        parse_status(status)
    }

    async fn save_order(&self, order: &Order) -> Result<i64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::query("create a transaction"))?;

        match Self::insert_order(&mut tx, order).await {
            Ok(order_id) => {
                tx.commit()
                    .await
                    .map_err(StoreError::query("commit the transaction"))?;

                tracing::info!(
                    order_id,
                    item_count = order.items.len(),
                    "✅ Transactionally persisted order and items"
                );
                Ok(order_id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Failed to roll back order transaction");
                }
                Err(e)
            }
        }
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<(), StoreError> {
        let result = sqlx::query(UPDATE_ORDER_STATUS)
            .bind(order_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::query("update order status"))?;

        if result.rows_affected() < 1 {
            return Err(StoreError::NotFound);
        }

        tracing::debug!(order_id, status = %status, "Order status updated");
        Ok(())
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

fn parse_status(value: String) -> Result<OrderStatus, StoreError> {
    value.parse().map_err(|_| StoreError::Corrupt {
        column: "orders.status",
        value,
    })
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    Ok(Order {
        id: column(row, "id")?,
        items: Vec::new(),
        coupon: column(row, "coupon")?,
        total_amount: column(row, "total_amount")?,
        status: parse_status(column(row, "status")?)?,
        created_at: column(row, "created_at")?,
        customer_cpf: column(row, "customer_cpf")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<OrderItem, StoreError> {
    let item_type: String = column(row, "item_type")?;
    let item_type = item_type
        .parse::<OrderItemType>()
        .map_err(|_| StoreError::Corrupt {
            column: "order_items.item_type",
            value: item_type,
        })?;

    Ok(OrderItem {
        id: column(row, "id")?,
        quantity: column(row, "quantity")?,
        item_type,
        product: ProductSnapshot {
            id: column(row, "product_id")?,
            name: column(row, "product_name")?,
            sku_id: column(row, "product_sku_id")?,
            description: column(row, "product_description")?,
            category: column(row, "product_category")?,
            price: column(row, "product_price")?,
        },
    })
}

// ============================================================================
// Tests
// ============================================================================
//
// The Postgres-backed tests need a reachable database in DATABASE_URL:
//   DATABASE_URL=postgres://... cargo test -- --ignored
//
// ============================================================================
