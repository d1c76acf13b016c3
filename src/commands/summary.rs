use crate::api::TransactionService;
use crate::models::Metrics;
use crate::services::LedgerStore;
use crate::utils::{format_money, format_ratio};

const BAR_WIDTH: usize = 20;

pub async fn execute<S: TransactionService>(store: &LedgerStore<S>) -> Result<String, String> {
    Ok(render(&store.metrics()))
}

pub fn render(metrics: &Metrics) -> String {
    let filled = ((metrics.ratio / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    format!(
        "💰 Balance  {}\n📈 Income   {}\n📉 Expense  {}\n📊 Income vs expense ratio  [{}{}] {}",
        format_money(metrics.balance),
        format_money(metrics.income),
        format_money(metrics.expense),
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        format_ratio(metrics.ratio)
    )
}
