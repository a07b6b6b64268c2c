//! 对账引擎依赖的外部协作方

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ReconResult;
use crate::models::{CorroborationRecord, CorroborationSource, Invoice, InvoiceLine};

/// 发票存储: 读取发票及其行, 按发票整体提交行修改
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// 读取发票及其有序行, 不存在时返回 None
    async fn load_invoice(&self, invoice_id: i64) -> ReconResult<Option<Invoice>>;

    /// 在一个事务内写回全部行的对账字段, 任一失败则全部回滚
    async fn commit_lines(&self, invoice_id: i64, lines: &[InvoiceLine]) -> ReconResult<()>;
}

/// 佐证记录查询 (工作单 / 场地签到)
///
/// 空结果表示"无佐证", 不是错误.
#[async_trait]
pub trait CorroborationLookup: Send + Sync {
    fn source(&self) -> CorroborationSource;

    async fn lookup(
        &self,
        subcontractor: &str,
        work_date: Option<NaiveDate>,
    ) -> ReconResult<Vec<CorroborationRecord>>;
}
