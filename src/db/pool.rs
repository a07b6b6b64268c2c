use crate::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// 创建数据库连接池
///
/// 每张发票一次查询+事务提交, 批量对账并发数不应超过连接数.
pub async fn create_pool(database: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let connect_options = PgConnectOptions::from_str(&database.url)?.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        Duration::from_secs(database.slow_statement_secs),
    );

    PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}
