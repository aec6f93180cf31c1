mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_login_and_me_round_trip() {
    let state = test_state().await;

    let response = test_app(&state)
        .await
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            json!({"name": "Ana", "email": "ana@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["roles"], json!(["USER"]));
    assert_eq!(body["data"]["type"], "Bearer");

    let response = test_app(&state)
        .await
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({"email": "ana@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = test_app(&state)
        .await
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "ana@example.com");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let state = test_state().await;
    register_user(&state, "Ana", "ana@example.com").await;

    let response = test_app(&state)
        .await
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({"email": "ana@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn deactivated_user_cannot_login() {
    let state = test_state().await;
    let user = register_user(&state, "Ana", "ana@example.com").await;

    storefront::domain::services::user_service::UserService::new(state.clone())
        .deactivate_user(user.id)
        .await
        .unwrap();

    let response = test_app(&state)
        .await
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({"email": "ana@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let state = test_state().await;
    register_user(&state, "Ana", "ana@example.com").await;

    let response = test_app(&state)
        .await
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            json!({"name": "Ana2", "email": "ana@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_maps_unique_violation_to_validation() {
    use storefront::domain::services::auth_service::AuthService;
    use storefront::error::AppError;

    let state = test_state().await;
    let service = AuthService::new(state.clone());

    service
        .register("Ana", "ana@example.com", "password123")
        .await
        .unwrap();

    // 约束冲突走客户端错误, 不是 500
    let err = service
        .register("Ana2", "ana@example.com", "other-password1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn malformed_registration_fails_validation() {
    let state = test_state().await;

    let response = test_app(&state)
        .await
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            json!({"name": "Ana", "email": "not-an-email", "password": "short"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_creation_through_api_uses_envelope() {
    let state = test_state().await;
    let user = register_user(&state, "Ana", "ana@example.com").await;
    let product = seed_product(&state, "Keyboard", 25.0, 5).await;
    let token = token_for(&state, &user);

    let response = test_app(&state)
        .await
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/orders")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    json!({
                        "items": [{"product_id": product.id, "quantity": 2}],
                        "shipping_address": "Somewhere 1"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 50.0);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(product_stock(&state, product.id).await, 3);
}
