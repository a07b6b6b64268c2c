//! 内存发票存储, 用于测试和嵌入式场景

use crate::error::{ReconError, ReconResult};
use crate::models::{Invoice, InvoiceLine};
use crate::traits::InvoiceStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    invoices: Mutex<HashMap<i64, Invoice>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, invoice: Invoice) {
        self.invoices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(invoice.id, invoice);
    }

    pub fn get(&self, invoice_id: i64) -> Option<Invoice> {
        self.invoices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&invoice_id)
            .cloned()
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn load_invoice(&self, invoice_id: i64) -> ReconResult<Option<Invoice>> {
        Ok(self.get(invoice_id))
    }

    /// 整体替换对账字段; 发票或任一行不存在时不做任何修改并报错
    async fn commit_lines(&self, invoice_id: i64, lines: &[InvoiceLine]) -> ReconResult<()> {
        let mut invoices = self.invoices.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(invoice) = invoices.get_mut(&invoice_id) else {
            return Err(ReconError::InvoiceNotFound(invoice_id));
        };

        let updated: HashMap<i64, &InvoiceLine> = lines.iter().map(|l| (l.id, l)).collect();
        let known = invoice.lines.iter().filter(|l| updated.contains_key(&l.id)).count();
        if known != updated.len() {
            return Err(ReconError::Persistence(sqlx::Error::RowNotFound));
        }

        for stored in invoice.lines.iter_mut() {
            if let Some(line) = updated.get(&stored.id) {
                stored.match_status = line.match_status;
                stored.match_score = line.match_score;
                stored.match_notes = line.match_notes.clone();
                stored.jobsheet_id = line.jobsheet_id.clone();
                stored.yard_record_id = line.yard_record_id.clone();
            }
        }
        Ok(())
    }
}
