//! In-process transaction service
//!
//! Behaves like the REST service: it assigns ids and timestamps, answers
//! `NotFound` for unknown ids and returns the list in insertion order.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ApiError, TransactionPayload, TransactionService};
use crate::models::{Amount, Transaction, TransactionId};

const NOT_FOUND_MESSAGE: &str = "No transaction matches the given query.";

#[derive(Default)]
pub struct InMemoryService {
    transactions: Mutex<Vec<Transaction>>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
        }
    }

    pub async fn len(&self) -> usize {
        self.transactions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.lock().await.is_empty()
    }
}

#[async_trait]
impl TransactionService for InMemoryService {
    async fn list(&self) -> Result<Vec<Transaction>, ApiError> {
        Ok(self.transactions.lock().await.clone())
    }

    async fn create(&self, payload: &TransactionPayload) -> Result<Transaction, ApiError> {
        let transaction = Transaction {
            id: TransactionId::new(Uuid::new_v4().to_string()),
            text: payload.text.clone(),
            amount: Amount::Number(payload.amount),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        self.transactions.lock().await.push(transaction.clone());
        Ok(transaction)
    }

    async fn update(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError> {
        let mut transactions = self.transactions.lock().await;
        let existing = transactions
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        existing.text = payload.text.clone();
        existing.amount = Amount::Number(payload.amount);
        Ok(existing.clone())
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
        let mut transactions = self.transactions.lock().await;
        let index = transactions
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        transactions.remove(index);
        Ok(())
    }
}
