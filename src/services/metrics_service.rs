//! Balance, income, expense and spend ratio of a transaction list
//!
//! Everything here is a pure function of its input. Amounts go through
//! [`sanitize_amounts`] first, so a single corrupt record counts as 0 instead
//! of poisoning the totals.

use crate::models::{Metrics, Transaction};

/// Numeric amounts of `transactions`, in list order, with anything that is
/// not a finite number replaced by 0.
pub fn sanitize_amounts(transactions: &[Transaction]) -> Vec<f64> {
    transactions.iter().map(|t| t.amount.sanitized()).collect()
}

pub fn compute_metrics(transactions: &[Transaction]) -> Metrics {
    let amounts = sanitize_amounts(transactions);

    let balance: f64 = amounts.iter().sum();
    let income: f64 = amounts.iter().filter(|a| **a > 0.0).sum();
    let expense: f64 = amounts.iter().filter(|a| **a < 0.0).sum();

    Metrics {
        balance,
        income,
        expense,
        ratio: spend_ratio(income, expense),
    }
}

/// Percentage of `income` consumed by `expense`, capped at 100.
/// Without income there is nothing to consume, so the ratio is 0.
pub fn spend_ratio(income: f64, expense: f64) -> f64 {
    if income > 0.0 {
        (expense.abs() / income * 100.0).min(100.0)
    } else {
        0.0
    }
}
