pub mod handlers;

pub use handlers::{batch_reconcile, health_check, invoice_report};

use crate::service::ReconcileService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(service: Arc<ReconcileService>) -> Router {
    let reconcile_routes = Router::new()
        .route("/api/reconcile/batch", post(batch_reconcile))
        .route("/api/reconcile/:invoice_id/report", get(invoice_report))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(reconcile_routes)
}
