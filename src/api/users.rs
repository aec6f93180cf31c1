use axum::{
    extract::{Path, State},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::domain::models::user::{Role, User};
use crate::domain::services::user_service::UserService;
use crate::error::AppError;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/{id}", get(get_user))
        .route("/{id}", delete(delete_user))
        .route("/{id}/deactivate", patch(deactivate_user))
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles: user.roles,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = UserService::new(state).list_users().await?;
    let users = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::success(users)))
}

async fn get_current_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = UserService::new(state).get_user_by_email(&auth.email).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = UserService::new(state).get_user(id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::new(state).delete_user(id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

async fn deactivate_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::new(state).deactivate_user(id).await?;
    Ok(Json(ApiResponse::message("User deactivated successfully")))
}
