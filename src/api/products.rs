use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::response::ApiResponse;
use crate::domain::models::product::Product;
use crate::domain::services::product_service::ProductService;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // 公开读取
        .route("/", get(list_products))
        .route("/active", get(list_active_products))
        .route("/available", get(list_available_products))
        .route("/category/{category}", get(list_by_category))
        .route("/search", get(search_products))
        .route("/{id}", get(get_product))
        // 管理员写入
        .route("/", post(create_product))
        .route("/{id}", put(update_product))
        .route("/{id}", delete(delete_product))
        .route("/{id}/deactivate", patch(deactivate_product))
        .route("/{id}/stock", patch(set_stock))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.01, message = "Price must be positive"))]
    pub price: f64,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.01, message = "Price must be positive"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetStockRequest {
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i64,
}

async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = ProductService::new(state).list_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

async fn list_active_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = ProductService::new(state).list_active_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

async fn list_available_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = ProductService::new(state).list_available_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = ProductService::new(state)
        .list_products_by_category(&category)
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = ProductService::new(state).search_products(&params.name).await?;
    Ok(Json(ApiResponse::success(products)))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = ProductService::new(state).get_product(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = Product::new(
        &payload.name,
        &payload.description,
        payload.price,
        payload.stock,
        &payload.category,
        &payload.image_url,
    );

    let product = ProductService::new(state).create_product(product).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Product created successfully",
        product,
    )))
}

async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = ProductService::new(state)
        .update_product(
            id,
            payload.name,
            payload.description,
            payload.price,
            payload.stock,
            payload.category,
            payload.image_url,
            payload.active,
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Product updated successfully",
        product,
    )))
}

async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    ProductService::new(state).delete_product(id).await?;
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}

async fn deactivate_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    ProductService::new(state).deactivate_product(id).await?;
    Ok(Json(ApiResponse::message("Product deactivated successfully")))
}

async fn set_stock(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStockRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    ProductService::new(state).set_stock(id, payload.stock).await?;
    Ok(Json(ApiResponse::message("Stock updated successfully")))
}
