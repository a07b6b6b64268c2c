pub mod reconciler;

pub use reconciler::{BatchReport, FailedInvoice, ReconcileService, ReconcileStats};
