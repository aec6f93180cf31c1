#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use storefront::config::{
    AuthConfig, Config, DatabaseConfig, LoggingConfig, PublicRoute, ServerConfig,
};
use storefront::domain::models::product::Product;
use storefront::domain::models::user::{Role, User};
use storefront::domain::services::auth_service::AuthService;
use storefront::domain::services::product_service::ProductService;
use storefront::server::{create_app, AppState};

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_expiry_hours: 24,
            public_routes: vec![
                PublicRoute {
                    prefix: "/api/auth".to_string(),
                    methods: None,
                },
                PublicRoute {
                    prefix: "/health".to_string(),
                    methods: None,
                },
                PublicRoute {
                    prefix: "/api/products".to_string(),
                    methods: Some(vec!["GET".to_string(), "HEAD".to_string()]),
                },
            ],
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        seed: None,
    }
}

pub async fn test_state() -> Arc<AppState> {
    test_state_with(test_config()).await
}

pub async fn test_state_with(config: Config) -> Arc<AppState> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    Arc::new(AppState::new(config, pool))
}

pub async fn test_app(state: &Arc<AppState>) -> axum::Router {
    create_app((**state).clone()).await.expect("router")
}

pub async fn register_user(state: &Arc<AppState>, name: &str, email: &str) -> User {
    let (user, _token) = AuthService::new(state.clone())
        .register(name, email, "password123")
        .await
        .expect("register user");
    user
}

/// 注册后提升为管理员 (数据库与令牌角色保持一致)
pub async fn register_admin(state: &Arc<AppState>, name: &str, email: &str) -> User {
    let mut user = register_user(state, name, email).await;

    sqlx::query("UPDATE users SET roles = 'USER,ADMIN' WHERE id = ?")
        .bind(user.id)
        .execute(&state.db)
        .await
        .expect("promote to admin");

    user.roles = vec![Role::User, Role::Admin];
    user
}

pub fn token_for(state: &Arc<AppState>, user: &User) -> String {
    state
        .tokens
        .issue(&user.email, &user.roles)
        .expect("issue token")
}

pub async fn seed_product(
    state: &Arc<AppState>,
    name: &str,
    price: f64,
    stock: i64,
) -> Product {
    ProductService::new(state.clone())
        .create_product(Product::new(name, "", price, stock, "general", ""))
        .await
        .expect("seed product")
}

pub async fn product_stock(state: &Arc<AppState>, id: uuid::Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await
        .expect("product stock")
}
