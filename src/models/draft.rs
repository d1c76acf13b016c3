//! Form drafts for creating and editing transactions

use thiserror::Error;

/// Why a draft was refused before reaching the remote service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    EmptyText,
    #[error("Amount '{0}' is not a valid number")]
    InvalidAmount(String),
}

/// Raw form input, exactly as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub text: String,
    pub amount: String,
}

/// A draft that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub text: String,
    pub amount: f64,
}

impl TransactionDraft {
    pub fn new(text: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            amount: amount.into(),
        }
    }

    /// Check that the description is present and the amount is a finite number.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| ValidationError::InvalidAmount(self.amount.clone()))?;

        Ok(ValidDraft {
            text: self.text.clone(),
            amount,
        })
    }
}
