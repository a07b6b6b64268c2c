use std::time::Duration;
use thiserror::Error;

/// 对账引擎错误
#[derive(Debug, Error)]
pub enum ReconError {
    /// 费率或阈值缺失/非法, 启动时即失败
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 佐证来源查询失败或超时
    #[error("{source_name} lookup failed: {message}")]
    ExternalLookup {
        source_name: &'static str,
        message: String,
    },

    /// 写回失败, 该发票的全部修改回滚
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    /// 写回事务超时, 事务已回滚
    #[error("commit of invoice {invoice_id} timed out after {timeout:?}")]
    CommitTimeout { invoice_id: i64, timeout: Duration },

    #[error("invoice {0} not found")]
    InvoiceNotFound(i64),
}

impl From<config::ConfigError> for ReconError {
    fn from(e: config::ConfigError) -> Self {
        ReconError::Configuration(e.to_string())
    }
}

pub type ReconResult<T> = Result<T, ReconError>;
