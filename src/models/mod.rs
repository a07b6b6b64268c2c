pub mod corroboration;
pub mod line;
pub mod role;
pub mod status;

pub use corroboration::{Corroboration, CorroborationRecord, CorroborationSource};
pub use line::{Invoice, InvoiceHeader, InvoiceLine, InvoiceLineRow};
pub use role::Role;
pub use status::MatchStatus;
