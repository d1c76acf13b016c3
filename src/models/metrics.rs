//! Summary metrics derived from the transaction list

/// Balance, income, expense and spend ratio of a ledger
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    /// Sum of every amount
    pub balance: f64,
    /// Sum of positive amounts
    pub income: f64,
    /// Sum of negative amounts, always <= 0
    pub expense: f64,
    /// Share of income consumed by expenses, in percent, capped at 100
    pub ratio: f64,
}
