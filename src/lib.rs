pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod rules;
pub mod service;
pub mod traits;

pub use config::AppConfig;
pub use db::{create_pool, MemoryStore, PgCorroborationLookup, PgInvoiceStore};
pub use error::{ReconError, ReconResult};
pub use rules::RuleSet;
pub use service::ReconcileService;
pub use traits::{CorroborationLookup, InvoiceStore};
