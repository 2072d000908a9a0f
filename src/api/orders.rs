use actix_web::{web, HttpRequest, HttpResponse};

use crate::domain::order::{OrderStatusChange, OrderSubmission, OrderUseCase};

use super::{decode, parse_id, ApiError, ListQuery};

pub(super) async fn get_all_orders(
    use_case: web::Data<dyn OrderUseCase>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let page = ListQuery::parse(req.query_string())?.page()?;

    let orders = use_case
        .get_all_orders(page)
        .await
        .map_err(|e| ApiError::order("failed to get all orders", e))?;

    Ok(HttpResponse::Ok().json(orders))
}

pub(super) async fn create_order(
    use_case: web::Data<dyn OrderUseCase>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let submission: OrderSubmission = decode(payload).await?;
    submission
        .validate()
        .map_err(|e| ApiError::order("invalid order", e))?;

    let created = use_case
        .create_order(submission)
        .await
        .map_err(|e| ApiError::order("failed to create order", e))?;

    Ok(HttpResponse::Ok().json(created))
}

pub(super) async fn get_order_status(
    use_case: web::Data<dyn OrderUseCase>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_id("invalid order id", &path)?;

    let status = use_case
        .get_order_status(order_id)
        .await
        .map_err(|e| ApiError::order("failed to get order status", e))?;

    Ok(HttpResponse::Ok().json(OrderStatusChange { status }))
}

pub(super) async fn update_order_status(
    use_case: web::Data<dyn OrderUseCase>,
    path: web::Path<String>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_id("invalid order id", &path)?;
    let change: OrderStatusChange = decode(payload).await?;

    use_case
        .update_order_status(order_id, change.status)
        .await
        .map_err(|e| ApiError::order("failed to update order status", e))?;

    Ok(HttpResponse::NoContent().finish())
}
