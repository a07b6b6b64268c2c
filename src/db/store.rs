use super::queries;
use crate::error::{ReconError, ReconResult};
use crate::models::{CorroborationRecord, CorroborationSource, Invoice, InvoiceLine};
use crate::traits::{CorroborationLookup, InvoiceStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

/// PostgreSQL 发票存储
#[derive(Clone)]
pub struct PgInvoiceStore {
    pool: PgPool,
}

impl PgInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    async fn load_invoice(&self, invoice_id: i64) -> ReconResult<Option<Invoice>> {
        let Some(header) = queries::get_invoice_header(&self.pool, invoice_id).await? else {
            return Ok(None);
        };

        let lines = queries::list_invoice_lines(&self.pool, invoice_id).await?;
        Ok(Some(Invoice {
            id: header.id,
            subcontractor: header.subcontractor_name,
            lines,
        }))
    }

    async fn commit_lines(&self, invoice_id: i64, lines: &[InvoiceLine]) -> ReconResult<()> {
        queries::update_lines(&self.pool, invoice_id, lines).await
    }
}

/// PostgreSQL 佐证查询, 按来源选择表
#[derive(Clone)]
pub struct PgCorroborationLookup {
    pool: PgPool,
    source: CorroborationSource,
}

impl PgCorroborationLookup {
    pub fn jobsheets(pool: PgPool) -> Self {
        Self {
            pool,
            source: CorroborationSource::Jobsheet,
        }
    }

    pub fn yard_signins(pool: PgPool) -> Self {
        Self {
            pool,
            source: CorroborationSource::YardSignIn,
        }
    }
}

#[async_trait]
impl CorroborationLookup for PgCorroborationLookup {
    fn source(&self) -> CorroborationSource {
        self.source
    }

    async fn lookup(
        &self,
        subcontractor: &str,
        work_date: Option<NaiveDate>,
    ) -> ReconResult<Vec<CorroborationRecord>> {
        let records = match self.source {
            CorroborationSource::Jobsheet => {
                queries::find_jobsheets(&self.pool, subcontractor, work_date).await
            }
            CorroborationSource::YardSignIn => {
                queries::find_yard_signins(&self.pool, subcontractor, work_date).await
            }
        };

        records.map_err(|e| ReconError::ExternalLookup {
            source_name: self.source.as_str(),
            message: e.to_string(),
        })
    }
}
