use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{auth, orders, products, users};
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::auth as auth_middleware;
use crate::utils::jwt::TokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: sqlx::SqlitePool,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(config: Config, db: sqlx::SqlitePool) -> Self {
        let tokens = TokenIssuer::from_hours(
            &config.auth.jwt_secret,
            config.auth.token_expiry_hours,
        );
        Self { config, db, tokens }
    }
}

pub async fn create_app(state: AppState) -> Result<Router, AppError> {
    let app_state = Arc::new(state);

    // 健康检查路由
    let health_route = Router::new().route("/health", get(|| async { "OK" }));

    // API 路由
    let api_routes = Router::new()
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .nest("/products", products::routes())
        .nest("/orders", orders::routes());

    // 组合所有路由; 访问过滤器对全部请求生效, 公开规则由其自行判定
    let app = Router::new()
        .nest("/api", api_routes)
        .merge(health_route)
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware::access_filter,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    Ok(app)
}
