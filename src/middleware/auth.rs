use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::models::user::Role;
use crate::error::AppError;
use crate::server::AppState;

/// 从令牌派生的请求身份, 由访问过滤器挂到请求扩展上
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// 访问过滤器: 决定请求是否需要已验证身份, 每个请求执行一次.
///
/// 过滤器本身从不拒绝请求 —— 缺失或非法令牌只是不挂身份,
/// 由处理器侧的提取器统一返回 401/403.
pub async fn access_filter(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    // CORS 预检直接放行
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    // 命中公开路由规则则不要求身份
    if state
        .config
        .auth
        .public_routes
        .iter()
        .any(|rule| rule.matches(&method, &path))
    {
        return next.run(request).await;
    }

    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = bearer {
        match state.tokens.verify(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser {
                    email: claims.sub,
                    roles: claims.roles,
                });
            }
            Err(err) => {
                tracing::debug!(%path, error = %err, "token verification failed");
            }
        }
    }

    next.run(request).await
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Auth("Missing or invalid credentials".to_string()))
    }
}

/// 管理员门槛: 未认证 401, 已认证但非 ADMIN 403
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }
        Ok(Self(user))
    }
}
