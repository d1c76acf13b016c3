pub mod client;
pub mod models;

pub use client::LedgerApiClient;
pub use models::{ApiError, TransactionPayload};
