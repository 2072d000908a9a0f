use actix_web::{web, HttpRequest, HttpResponse};

use crate::domain::product::{ProductDraft, ProductService};

use super::{decode, parse_id, ApiError, ListQuery};

pub(super) async fn get_all_products(
    service: web::Data<ProductService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let query = ListQuery::parse(req.query_string())?;
    let page = query.page()?;
    let category = query.category.as_deref().filter(|c| !c.is_empty());

    let products = service
        .get_all_products(page, category)
        .await
        .map_err(|e| ApiError::product("failed to get all products", e))?;

    Ok(HttpResponse::Ok().json(products))
}

pub(super) async fn create_product(
    service: web::Data<ProductService>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let draft: ProductDraft = decode(payload).await?;

    let id = service
        .create_product(draft)
        .await
        .map_err(|e| ApiError::product("failed to create product", e))?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

pub(super) async fn update_product(
    service: web::Data<ProductService>,
    path: web::Path<String>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id("invalid product id", &path)?;
    let draft: ProductDraft = decode(payload).await?;

    service
        .update_product(id, draft)
        .await
        .map_err(|e| ApiError::product("failed to update product", e))?;

    Ok(HttpResponse::NoContent().finish())
}

pub(super) async fn delete_product(
    service: web::Data<ProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id("invalid product id", &path)?;

    service
        .delete_product(id)
        .await
        .map_err(|e| ApiError::product("failed to delete product", e))?;

    Ok(HttpResponse::NoContent().finish())
}
