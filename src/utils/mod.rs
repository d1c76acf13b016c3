pub mod errors;
pub mod format;
pub mod table;

pub use errors::LedgerError;
pub use format::{format_date, format_money, format_ratio, format_signed_amount};
pub use table::Table;
