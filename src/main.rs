use storefront::config::Config;
use storefront::infrastructure::database::seed::bootstrap_admin;
use storefront::infrastructure::database::sqlite::init_sqlite;
use storefront::logging::init_logging;
use storefront::server::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_logging(&config)?;

    tracing::info!("Starting storefront API service");

    // 初始化数据库连接
    let db_pool = init_sqlite(&config).await?;

    // 创建应用状态
    let app_state = AppState::new(config.clone(), db_pool);

    // 首次启动引导管理员账号
    bootstrap_admin(&app_state).await?;

    // 创建并启动服务器
    let app = create_app(app_state).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", &addr);

    axum::serve(listener, app).await?;
    Ok(())
}
