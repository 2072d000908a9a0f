use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};

use crate::domain::pagination::PageParams;
use crate::domain::product::{Product, ProductDraft};

use super::error::{column, StoreError};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all_products(
        &self,
        page: &PageParams,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError>;

    async fn find_product_by_id(&self, id: i64) -> Result<Product, StoreError>;

    async fn save_product(&self, draft: &ProductDraft, now: DateTime<Utc>) -> Result<i64, StoreError>;

    async fn update_product(
        &self,
        id: i64,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn delete_product(&self, id: i64) -> Result<(), StoreError>;
}

const PRODUCT_COLUMNS: &str = "id, name, sku_id, description, category, price, created_at, updated_at";

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all_products(
        &self,
        page: &PageParams,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::TEXT IS NULL OR category = $1) \
             ORDER BY id LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query(&query)
            .bind(category)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::query("find all products"))?;

        rows.iter().map(product_from_row).collect()
    }

    async fn find_product_by_id(&self, id: i64) -> Result<Product, StoreError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::query("find product by id"))?
            .ok_or(StoreError::NotFound)?;

        product_from_row(&row)
    }

    async fn save_product(&self, draft: &ProductDraft, now: DateTime<Utc>) -> Result<i64, StoreError> {
        sqlx::query_scalar(
            "INSERT INTO products (name, sku_id, description, category, price, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.sku_id)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.price)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::query("save product"))
    }

    async fn update_product(
        &self,
        id: i64,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, sku_id = $3, description = $4, category = $5, \
             price = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.sku_id)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.price)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StoreError::query("update product"))?;

        if result.rows_affected() < 1 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::query("delete product"))?;

        if result.rows_affected() < 1 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: column(row, "id")?,
        name: column(row, "name")?,
        sku_id: column(row, "sku_id")?,
        description: column(row, "description")?,
        category: column(row, "category")?,
        price: column(row, "price")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pg_pool;
    use rust_decimal::Decimal;

    #[tokio::test]
    #[ignore = "requires postgres (DATABASE_URL)"]
    async fn test_product_crud() {
        let repository = PgProductRepository::new(pg_pool().await);
        let mut draft = ProductDraft {
            name: "Batata Frita".to_string(),
            sku_id: "SKU-BF".to_string(),
            description: "Fries".to_string(),
            category: "Acompanhamento".to_string(),
            price: Decimal::new(1200, 2),
        };

        let id = repository.save_product(&draft, Utc::now()).await.unwrap();
        assert_eq!(repository.find_product_by_id(id).await.unwrap().price, Decimal::new(1200, 2));

        draft.price = Decimal::new(1350, 2);
        repository.update_product(id, &draft, Utc::now()).await.unwrap();
        assert_eq!(repository.find_product_by_id(id).await.unwrap().price, Decimal::new(1350, 2));

        repository.delete_product(id).await.unwrap();
        assert!(matches!(repository.find_product_by_id(id).await, Err(StoreError::NotFound)));
        assert!(matches!(repository.delete_product(id).await, Err(StoreError::NotFound)));
    }
}
