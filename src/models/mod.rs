//! Data models for the ledger client
//!
//! Wire records received from the remote service, the derived metrics shown
//! next to them, raw form drafts and the notifications emitted per operation.

pub mod draft;
pub mod metrics;
pub mod notification;
pub mod transaction;

// Re-export commonly used types for convenience
pub use draft::{TransactionDraft, ValidDraft, ValidationError};
pub use metrics::Metrics;
pub use notification::{Notification, NotificationLevel};
pub use transaction::{Amount, Transaction, TransactionId};
