//! Remote transaction-storage boundary
//!
//! [`TransactionService`] is the seam the ledger store talks through. The HTTP
//! client speaks to the real REST service; [`memory::InMemoryService`] keeps
//! everything in process for offline use and tests.

pub mod ledger;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Transaction, TransactionId};

pub use ledger::{ApiError, LedgerApiClient, TransactionPayload};
pub use memory::InMemoryService;

/// The four remote operations on the transaction collection
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// GET transactions/
    async fn list(&self) -> Result<Vec<Transaction>, ApiError>;

    /// POST transactions/
    async fn create(&self, payload: &TransactionPayload) -> Result<Transaction, ApiError>;

    /// PUT transactions/{id}/
    async fn update(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError>;

    /// DELETE transactions/{id}/
    async fn delete(&self, id: &TransactionId) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: TransactionService + ?Sized> TransactionService for Arc<T> {
    async fn list(&self) -> Result<Vec<Transaction>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, payload: &TransactionPayload) -> Result<Transaction, ApiError> {
        (**self).create(payload).await
    }

    async fn update(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError> {
        (**self).update(id, payload).await
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}
