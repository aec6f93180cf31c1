use crate::domain::models::user::{Role, User};
use crate::domain::services::auth_service::hash_password;
use crate::error::AppError;
use crate::server::AppState;

/// 启动引导: 用户表为空时创建配置的管理员账号.
///
/// 只看总数, 不看邮箱: 已有任何用户即认为实例已初始化,
/// 重复启动不会再写入.
pub async fn bootstrap_admin(state: &AppState) -> Result<(), AppError> {
    let Some(seed) = &state.config.seed else {
        return Ok(());
    };

    let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;

    if user_count > 0 {
        return Ok(());
    }

    let mut admin = User::new(
        &seed.admin_email,
        &seed.admin_name,
        &hash_password(&seed.admin_password)?,
    );
    admin.roles = vec![Role::User, Role::Admin];

    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash, roles, active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(admin.id)
    .bind(&admin.email)
    .bind(&admin.name)
    .bind(&admin.password_hash)
    .bind(admin.roles_column())
    .bind(admin.active)
    .bind(admin.created_at)
    .bind(admin.updated_at)
    .execute(&state.db)
    .await?;

    tracing::info!(email = %admin.email, "bootstrap admin account created");
    Ok(())
}
