use crate::error::{ReconError, ReconResult};
use crate::models::{Corroboration, CorroborationRecord, InvoiceLine, MatchStatus};
use crate::rules::{apply_verdict, evaluate_line, RuleSet};
use crate::traits::{CorroborationLookup, InvoiceStore};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// 单张发票对账统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub invoice_id: i64,
    pub total_lines: usize,
    pub matched: usize,
    pub partial_match: usize,
    pub needs_review: usize,
    pub rejected: usize,
    pub jobsheets_found: usize,
    pub yard_records_found: usize,
}

impl ReconcileStats {
    fn record(&mut self, line: &InvoiceLine) {
        self.total_lines += 1;
        match line.match_status {
            MatchStatus::Matched => self.matched += 1,
            MatchStatus::PartialMatch => self.partial_match += 1,
            MatchStatus::NeedsReview => self.needs_review += 1,
            MatchStatus::Rejected => self.rejected += 1,
        }
        if line.jobsheet_id.is_some() {
            self.jobsheets_found += 1;
        }
        if line.yard_record_id.is_some() {
            self.yard_records_found += 1;
        }
    }
}

/// 批量对账中失败的发票
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedInvoice {
    pub invoice_id: i64,
    pub error: String,
}

/// 批量对账结果 (按请求顺序)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub reconciled: Vec<ReconcileStats>,
    pub failed: Vec<FailedInvoice>,
}

/// 发票行对账服务
///
/// 逐行查询工作单与场地签到, 执行检查并推导结论, 最后按发票整体提交.
pub struct ReconcileService {
    store: Arc<dyn InvoiceStore>,
    jobsheets: Arc<dyn CorroborationLookup>,
    yard_signins: Arc<dyn CorroborationLookup>,
    rules: RuleSet,
    lookup_timeout: Duration,
    batch_concurrency: usize,
}

impl ReconcileService {
    pub fn new(
        store: Arc<dyn InvoiceStore>,
        jobsheets: Arc<dyn CorroborationLookup>,
        yard_signins: Arc<dyn CorroborationLookup>,
        rules: RuleSet,
    ) -> Self {
        Self {
            store,
            jobsheets,
            yard_signins,
            rules,
            lookup_timeout: Duration::from_secs(30),
            batch_concurrency: 4,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// 批量对账入口: 去重保序, 有限并发, 单张失败不影响其他发票
    pub async fn reconcile_batch(&self, invoice_ids: &[i64]) -> BatchReport {
        let unique: IndexSet<i64> = invoice_ids.iter().copied().collect();
        tracing::info!(
            "批量对账开始: {} 张发票 (请求 {} 个ID), 并发 {}",
            unique.len(),
            invoice_ids.len(),
            self.batch_concurrency
        );

        let outcomes: Vec<(i64, ReconResult<ReconcileStats>)> = stream::iter(unique)
            .map(|invoice_id| async move { (invoice_id, self.reconcile_invoice(invoice_id).await) })
            .buffered(self.batch_concurrency)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (invoice_id, outcome) in outcomes {
            match outcome {
                Ok(stats) => report.reconciled.push(stats),
                Err(e) => {
                    tracing::error!("Invoice {} reconciliation failed: {}", invoice_id, e);
                    report.failed.push(FailedInvoice {
                        invoice_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "批量对账完成: 成功 {}, 失败 {}",
            report.reconciled.len(),
            report.failed.len()
        );
        report
    }

    /// 单张发票对账
    pub async fn reconcile_invoice(&self, invoice_id: i64) -> ReconResult<ReconcileStats> {
        let Some(mut invoice) = self.store.load_invoice(invoice_id).await? else {
            return Err(ReconError::InvoiceNotFound(invoice_id));
        };

        let mut stats = ReconcileStats {
            invoice_id,
            ..ReconcileStats::default()
        };
        if invoice.lines.is_empty() {
            tracing::info!("Invoice {} has no lines, skipping", invoice_id);
            return Ok(stats);
        }

        let subcontractor = invoice.subcontractor.clone();
        if subcontractor.is_none() {
            tracing::warn!("Invoice {} 无分包商, 全部行按无佐证处理", invoice_id);
        }

        let total_lines = invoice.lines.len();
        for (idx, line) in invoice.lines.iter_mut().enumerate() {
            let corroboration = match subcontractor.as_deref() {
                Some(name) => self.corroborate(name, line.work_date).await,
                None => Corroboration::none(),
            };

            let verdict = evaluate_line(line, &self.rules, &corroboration);
            tracing::debug!(
                "发票 {} 行 {} ({}/{}): {} score={:.2} notes=[{}]",
                invoice_id,
                line.id,
                idx + 1,
                total_lines,
                verdict.status,
                verdict.score,
                verdict.notes
            );
            apply_verdict(line, &corroboration, verdict);
            stats.record(line);
        }

        // 全部行处理完成后一次性提交; 失败则整张发票不变
        self.store.commit_lines(invoice_id, &invoice.lines).await?;

        tracing::info!(
            "Invoice {}: 对账完成 - 行: {}, MATCHED: {}, PARTIAL_MATCH: {}, NEEDS_REVIEW: {}",
            invoice_id,
            stats.total_lines,
            stats.matched,
            stats.partial_match,
            stats.needs_review
        );
        Ok(stats)
    }

    /// 并发查询两个佐证来源, 互不阻塞
    async fn corroborate(&self, subcontractor: &str, work_date: Option<NaiveDate>) -> Corroboration {
        let (jobsheets, yard_records) = tokio::join!(
            self.fetch(self.jobsheets.as_ref(), subcontractor, work_date),
            self.fetch(self.yard_signins.as_ref(), subcontractor, work_date),
        );
        Corroboration::from_records(&jobsheets, &yard_records)
    }

    /// 查询失败或超时按"无记录"处理
    async fn fetch(
        &self,
        lookup: &dyn CorroborationLookup,
        subcontractor: &str,
        work_date: Option<NaiveDate>,
    ) -> Vec<CorroborationRecord> {
        let source = lookup.source().as_str();
        match tokio::time::timeout(self.lookup_timeout, lookup.lookup(subcontractor, work_date)).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!("{} ({}, {:?}) 查询失败, 按无记录处理: {}", source, subcontractor, work_date, e);
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    "{} ({}, {:?}) 查询超时 (>{:?}), 按无记录处理",
                    source,
                    subcontractor,
                    work_date,
                    self.lookup_timeout
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_report_serializes_for_the_api() {
        let report = BatchReport {
            reconciled: vec![ReconcileStats {
                invoice_id: 7,
                total_lines: 2,
                matched: 1,
                needs_review: 1,
                jobsheets_found: 1,
                ..ReconcileStats::default()
            }],
            failed: vec![FailedInvoice {
                invoice_id: 99,
                error: "invoice 99 not found".to_string(),
            }],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["reconciled"][0]["invoice_id"], json!(7));
        assert_eq!(value["reconciled"][0]["needs_review"], json!(1));
        assert_eq!(value["failed"][0], json!({"invoice_id": 99, "error": "invoice 99 not found"}));

        let back: BatchReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn stats_count_each_status() {
        let mut stats = ReconcileStats::default();
        for status in [MatchStatus::Matched, MatchStatus::PartialMatch, MatchStatus::NeedsReview, MatchStatus::Rejected] {
            let mut line = InvoiceLine::new(1, None, crate::models::Role::Yard);
            line.match_status = status;
            stats.record(&line);
        }
        assert_eq!(stats.total_lines, 4);
        assert_eq!((stats.matched, stats.partial_match, stats.needs_review, stats.rejected), (1, 1, 1, 1));
    }
}
