//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderExpanded, OrderStatusUpdate, OrderSummary};
use crate::db::repository::OrderRepository;
use crate::orders;
use crate::utils::{AppError, AppResult};

/// Response for the total sales endpoint
///
/// The value is a fixed-point decimal and serializes as a decimal string.
#[derive(Debug, Serialize)]
pub struct TotalSalesResponse {
    pub totalsales: Decimal,
}

/// Response for the order count endpoint
#[derive(Debug, Serialize)]
pub struct OrderCountResponse {
    #[serde(rename = "orderCount")]
    pub order_count: i64,
}

/// Response for order deletion
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// GET /orders - all orders, user name expanded, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderSummary>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.list_summaries().await?;
    Ok(Json(orders))
}

/// GET /orders/{id} - one order with nested expansion
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderExpanded>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_expanded(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// POST /orders - create an order with computed total price
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let order = orders::create_order(&state.db, payload).await?;
    Ok(Json(order))
}

/// PUT /orders/{id} - update only the order status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = orders::update_status(&state.db, &id, payload.status).await?;
    Ok(Json(order))
}

/// DELETE /orders/{id} - delete the order and its line items
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    orders::delete_order(&state.db, &id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "The order is deleted".to_string(),
    }))
}

/// GET /orders/get/totalsales - sum of total_price across all orders
pub async fn total_sales(State(state): State<ServerState>) -> AppResult<Json<TotalSalesResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let totalsales = repo.total_sales().await?;
    Ok(Json(TotalSalesResponse { totalsales }))
}

/// GET /orders/get/count - order count
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<OrderCountResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let order_count = repo.count().await?;
    Ok(Json(OrderCountResponse { order_count }))
}

/// GET /orders/get/userorders/{userid} - one user's orders, expanded
pub async fn user_orders(
    State(state): State<ServerState>,
    Path(userid): Path<String>,
) -> AppResult<Json<Vec<OrderExpanded>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_expanded_by_user(&userid).await?;
    Ok(Json(orders))
}
