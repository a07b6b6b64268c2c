use std::sync::Arc;
use subcontractor_recon::{
    api, create_pool, AppConfig, PgCorroborationLookup, PgInvoiceStore, ReconcileService, RuleSet,
};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置, 费率或阈值缺失时直接退出
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let service = ReconcileService::new(
        Arc::new(PgInvoiceStore::new(pool.clone())),
        Arc::new(PgCorroborationLookup::jobsheets(pool.clone())),
        Arc::new(PgCorroborationLookup::yard_signins(pool)),
        RuleSet::from_config(&config.rules),
    )
    .with_lookup_timeout(config.lookup.timeout())
    .with_batch_concurrency(config.lookup.batch_concurrency);

    let app = api::router(Arc::new(service));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/reconcile/batch               - reconcile invoices");
    info!("  GET  /api/reconcile/:invoice_id/report  - CSV line report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
