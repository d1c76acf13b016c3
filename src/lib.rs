//! Personal ledger client
//!
//! Keeps a session copy of a remote transaction list in a [`LedgerStore`],
//! derives balance, income, expense and spend ratio from it, and funnels every
//! create, edit and delete through the remote service followed by a full
//! re-fetch.

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use api::{ApiError, InMemoryService, LedgerApiClient, TransactionService};
pub use config::{Config, ConfigError};
pub use models::{Metrics, Notification, Transaction, TransactionDraft, TransactionId};
pub use services::{compute_metrics, LedgerStore};
pub use utils::LedgerError;
