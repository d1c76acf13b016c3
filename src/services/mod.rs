pub mod ledger_store;
pub mod metrics_service;
pub mod notifier;

pub use ledger_store::{LedgerStore, Snapshot};
pub use metrics_service::compute_metrics;
pub use notifier::{NotificationSink, TracingSink};
