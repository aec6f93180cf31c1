use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::response::ApiResponse;
use crate::domain::models::order::{Order, OrderItem, OrderStatus};
use crate::domain::services::order_service::{OrderLine, OrderService};
use crate::domain::services::user_service::UserService;
use crate::error::AppError;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_orders))
        .route("/", post(create_order))
        .route("/my-orders", get(my_orders))
        .route("/status/{status}", get(list_by_status))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/cancel", patch(cancel_order))
        .route("/{id}", delete(delete_order))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderItemRequest>,
    #[validate(length(min = 1, message = "Shipping address cannot be empty"))]
    pub shipping_address: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let orders = OrderService::new(state).list_orders().await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn my_orders(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let user = UserService::new(state.clone())
        .get_user_by_email(&auth.email)
        .await?;
    let orders = OrderService::new(state).list_orders_by_user(user.id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn list_by_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let status: OrderStatus = status
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown order status: {}", status)))?;

    let orders = OrderService::new(state).list_orders_by_status(status).await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn get_order(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let order_service = OrderService::new(state.clone());
    let order = order_service.get_order(id).await?;

    // 只有订单所有者或管理员可以查看
    let user = UserService::new(state).get_user_by_email(&auth.email).await?;
    if order.user_id != user.id && !auth.is_admin() {
        return Err(AppError::Forbidden(
            "Not allowed to view this order".to_string(),
        ));
    }

    let items = order_service.get_order_items(id).await?;
    Ok(Json(ApiResponse::success(OrderResponse { order, items })))
}

async fn create_order(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = UserService::new(state.clone())
        .get_user_by_email(&auth.email)
        .await?;

    let lines: Vec<OrderLine> = payload
        .items
        .iter()
        .map(|item| OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let (order, items) = OrderService::new(state)
        .create_order(user.id, &lines, &payload.shipping_address, payload.notes)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Order created successfully",
        OrderResponse { order, items },
    )))
}

async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = OrderService::new(state).update_status(id, payload.status).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Order status updated successfully",
        order,
    )))
}

async fn cancel_order(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let order_service = OrderService::new(state.clone());
    let order = order_service.get_order(id).await?;

    // 只有订单所有者或管理员可以取消
    let user = UserService::new(state).get_user_by_email(&auth.email).await?;
    if order.user_id != user.id && !auth.is_admin() {
        return Err(AppError::Forbidden(
            "Not allowed to cancel this order".to_string(),
        ));
    }

    order_service.cancel_order(id).await?;
    Ok(Json(ApiResponse::message("Order cancelled successfully")))
}

async fn delete_order(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    OrderService::new(state).delete_order(id).await?;
    Ok(Json(ApiResponse::message("Order deleted successfully")))
}
