use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::pagination::{Page, PageParams};
use crate::store::{ProductRepository, StoreError};

use super::errors::ProductError;
use super::value_objects::{Product, ProductDraft};

/// Product lookup consumed by the order use case when pricing items.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_product_by_id(&self, id: i64) -> Result<Product, ProductError>;
}

// ============================================================================
// Product Service
// ============================================================================
//
// Validates drafts, stamps timestamps and maps store misses to NotFound
// before delegating to the repository.
//
// ============================================================================

pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all_products(
        &self,
        page: PageParams,
        category: Option<&str>,
    ) -> Result<Page<Product>, ProductError> {
        let products = self
            .repository
            .find_all_products(&page, category)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to get all products"))?;

        Ok(Page::build(products, page))
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<i64, ProductError> {
        draft.validate()?;

        let id = self
            .repository
            .save_product(&draft, Utc::now())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to save product"))?;

        tracing::info!(product_id = id, name = %draft.name, "Product created");
        Ok(id)
    }

    pub async fn update_product(&self, id: i64, draft: ProductDraft) -> Result<(), ProductError> {
        draft.validate()?;

        self.repository
            .update_product(id, &draft, Utc::now())
            .await
            .map_err(|e| not_found_or(id, e))
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ProductError> {
        self.repository
            .delete_product(id)
            .await
            .map_err(|e| not_found_or(id, e))?;

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for ProductService {
    async fn get_product_by_id(&self, id: i64) -> Result<Product, ProductError> {
        self.repository
            .find_product_by_id(id)
            .await
            .map_err(|e| not_found_or(id, e))
    }
}

fn not_found_or(id: i64, err: StoreError) -> ProductError {
    match err {
        StoreError::NotFound => ProductError::NotFound(id),
        other => {
            tracing::error!(product_id = id, error = %other, "product store operation failed");
            ProductError::Store(other)
        }
    }
}
