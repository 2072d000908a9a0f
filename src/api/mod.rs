// ============================================================================
// HTTP API - /v1 routes
// ============================================================================
//
// Handlers decode bodies, path ids and query strings themselves so that every
// rejection carries the same {message, error} body.
//
// ============================================================================

mod error;
mod orders;
mod products;

use std::sync::Arc;

use actix_web::web;
use futures_util::StreamExt;
use serde::Deserialize;

use crate::domain::order::OrderUseCase;
use crate::domain::pagination::PageParams;
use crate::domain::product::ProductService;

pub use error::ApiError;

/// Largest request body accepted by any handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn configure(
    order_use_case: Arc<dyn OrderUseCase>,
    product_service: Arc<ProductService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::from(order_use_case))
            .app_data(web::Data::from(product_service))
            .service(
                web::scope("/v1")
                    .route("/orders", web::get().to(orders::get_all_orders))
                    .route("/orders", web::post().to(orders::create_order))
                    .route("/orders/{id}/status", web::get().to(orders::get_order_status))
                    .route("/orders/{id}/status", web::put().to(orders::update_order_status))
                    .route("/products", web::get().to(products::get_all_products))
                    .route("/products", web::post().to(products::create_product))
                    .route("/products/{id}", web::put().to(products::update_product))
                    .route("/products/{id}", web::delete().to(products::delete_product)),
            );
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    limit: Option<String>,
    offset: Option<String>,
    category: Option<String>,
}

impl ListQuery {
    fn parse(query_string: &str) -> Result<Self, ApiError> {
        web::Query::<ListQuery>::from_query(query_string)
            .map(web::Query::into_inner)
            .map_err(|e| ApiError::bad_request("invalid query string", e))
    }

    /// Absent or empty values fall back to the defaults; anything non-numeric is rejected.
    fn page(&self) -> Result<PageParams, ApiError> {
        let offset = parse_number("invalid offset", self.offset.as_deref())?.unwrap_or(0);
        let limit = parse_number("invalid limit", self.limit.as_deref())?.unwrap_or(0);
        Ok(PageParams::new(offset, limit))
    }
}

fn parse_number(message: &'static str, value: Option<&str>) -> Result<Option<i64>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|e| ApiError::bad_request(message, e)),
        None => Ok(None),
    }
}

fn parse_id(message: &'static str, raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|e| ApiError::bad_request(message, e))
}

/// Reads the whole body, refusing anything over `MAX_BODY_BYTES`, and decodes it as JSON.
async fn decode<T: serde::de::DeserializeOwned>(mut payload: web::Payload) -> Result<T, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::bad_request("invalid request body", e))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ApiError::payload_too_large(MAX_BODY_BYTES));
        }
        body.extend_from_slice(&chunk);
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::bad_request("invalid request body", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_parsing() {
        let page = ListQuery::parse("limit=20&offset=40").unwrap().page().unwrap();
        assert_eq!((page.offset(), page.limit()), (40, 20));

        let page = ListQuery::parse("limit=&offset=").unwrap().page().unwrap();
        assert_eq!(page, PageParams::default());

        assert!(ListQuery::parse("limit=ten").unwrap().page().is_err());
        assert!(ListQuery::parse("offset=1.5").unwrap().page().is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("invalid id", "42").unwrap(), 42);
        assert!(parse_id("invalid id", "abc").is_err());
    }
}
