use thiserror::Error;

use crate::api::ApiError;
use crate::models::ValidationError;

/// Failure of a ledger store operation.
///
/// None of these are fatal: the store reports them, keeps its list as it
/// was, and hands them back so the caller can react.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Expense of {amount:.2} exceeds the available balance of {balance:.2}")]
    InsufficientBalance { amount: f64, balance: f64 },
    #[error("Remote request failed: {0}")]
    Fetch(#[from] ApiError),
}

impl LedgerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, LedgerError::InsufficientBalance { .. })
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, LedgerError::Fetch(_))
    }

    /// True when the remote service did not know the requested id
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::Fetch(e) if e.is_not_found())
    }
}
