mod common;

use common::*;
use storefront::config::{Config, SeedConfig};
use storefront::infrastructure::database::seed::bootstrap_admin;

fn seeded_config() -> Config {
    let mut config = test_config();
    config.seed = Some(SeedConfig {
        admin_name: "Administrator".to_string(),
        admin_email: "admin@storefront.local".to_string(),
        admin_password: "admin123".to_string(),
    });
    config
}

#[tokio::test]
async fn empty_database_gets_bootstrap_admin() {
    let state = test_state_with(seeded_config()).await;

    bootstrap_admin(&state).await.unwrap();

    // 引导出的账号可以登录并持有 ADMIN 角色
    let (user, _token) =
        storefront::domain::services::auth_service::AuthService::new(state.clone())
            .login("admin@storefront.local", "admin123")
            .await
            .unwrap();

    assert!(user.is_admin());
    assert!(user.active);
}

#[tokio::test]
async fn bootstrap_admin_token_passes_admin_gate() {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    let state = test_state_with(seeded_config()).await;
    bootstrap_admin(&state).await.unwrap();

    let (admin, token) =
        storefront::domain::services::auth_service::AuthService::new(state.clone())
            .login("admin@storefront.local", "admin123")
            .await
            .unwrap();
    assert!(admin.is_admin());

    let response = test_app(&state)
        .await
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bootstrap_is_gated_on_user_count() {
    let state = test_state_with(seeded_config()).await;

    // 重复引导不产生第二个账号
    bootstrap_admin(&state).await.unwrap();
    bootstrap_admin(&state).await.unwrap();

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn bootstrap_skips_initialized_instance() {
    let state = test_state_with(seeded_config()).await;
    register_user(&state, "Ana", "ana@example.com").await;

    bootstrap_admin(&state).await.unwrap();

    // 已有用户的实例不再写入管理员
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn bootstrap_without_seed_config_is_a_no_op() {
    let state = test_state().await;

    bootstrap_admin(&state).await.unwrap();

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
