use crate::db::write_report;
use crate::error::ReconError;
use crate::service::{BatchReport, ReconcileService};
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 发票ID列表
#[derive(Debug, Deserialize)]
pub struct BatchReconcileRequest {
    pub invoice_ids: Vec<i64>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct BatchReconcileResponse {
    pub success: bool,
    pub message: String,
    pub report: BatchReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 批量对账接口
pub async fn batch_reconcile(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<BatchReconcileRequest>,
) -> Response {
    let report = service.reconcile_batch(&req.invoice_ids).await;
    let lines: usize = report.reconciled.iter().map(|s| s.total_lines).sum();
    let success = report.failed.is_empty();
    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };

    let response = BatchReconcileResponse {
        success,
        message: format!(
            "Reconciled {} invoices ({} lines), {} failed",
            report.reconciled.len(),
            lines,
            report.failed.len()
        ),
        report,
    };
    (status, Json(response)).into_response()
}

/// 导出单张发票的对账结果 (CSV)
pub async fn invoice_report(
    State(service): State<Arc<ReconcileService>>,
    Path(invoice_id): Path<i64>,
) -> Response {
    let invoice = match service.store().load_invoice(invoice_id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => return error_response(ReconError::InvoiceNotFound(invoice_id)),
        Err(e) => return error_response(e),
    };

    let mut body = Vec::new();
    if let Err(e) = write_report(&invoice.lines, &mut body) {
        tracing::error!("Invoice {} CSV export failed: {}", invoice_id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                message: format!("Error: {}", e),
            }),
        )
            .into_response();
    }

    (StatusCode::OK, [(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response()
}

fn error_response(e: ReconError) -> Response {
    let status = match e {
        ReconError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let response = ErrorResponse {
        success: false,
        message: format!("Error: {}", e),
    };
    (status, Json(response)).into_response()
}
