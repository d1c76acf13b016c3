use crate::api::TransactionService;
use crate::services::LedgerStore;
use crate::utils::{format_date, format_signed_amount, Table};

pub async fn execute<S: TransactionService>(store: &LedgerStore<S>) -> Result<String, String> {
    let transactions = store.transactions();
    if transactions.is_empty() {
        return Ok("📋 No transactions yet. Use `add <amount> <description>` to record one.".to_string());
    }

    let mut table = Table::new(&["#", "Description", "Amount", "Date", "ID"]).align_right(2);
    for (index, t) in transactions.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            t.text.clone(),
            format_signed_amount(&t.amount),
            format_date(&t.created_at),
            t.id.to_string(),
        ]);
    }

    Ok(table.render())
}
