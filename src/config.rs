use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    /// 为空则跳过启动引导
    #[serde(default)]
    pub seed: Option<SeedConfig>,
}

/// 首次启动时引导的管理员账号
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: u64,
    /// 公开路由规则, 注入配置而非编译期常量
    #[serde(default = "default_public_routes")]
    pub public_routes: Vec<PublicRoute>,
}

/// 前缀匹配规则; `methods` 为 `None` 时所有方法均视为公开
#[derive(Debug, Clone, Deserialize)]
pub struct PublicRoute {
    pub prefix: String,
    #[serde(default)]
    pub methods: Option<Vec<String>>,
}

impl PublicRoute {
    pub fn matches(&self, method: &str, path: &str) -> bool {
        if !path.starts_with(&self.prefix) {
            return false;
        }
        match &self.methods {
            Some(methods) => methods.iter().any(|m| m.eq_ignore_ascii_case(method)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_token_expiry_hours() -> u64 {
    24
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

fn default_public_routes() -> Vec<PublicRoute> {
    vec![
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
    ]
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::from(Path::new(&config_path).join("default")))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let config = builder.build()?;
        let config: Config = config.try_deserialize()?;

        Ok(config)
    }
}
