use crate::api::TransactionService;
use crate::models::TransactionDraft;
use crate::services::LedgerStore;
use crate::utils::format_money;

pub async fn execute<S: TransactionService>(
    store: &LedgerStore<S>,
    args: &[&str],
) -> Result<String, String> {
    let Some((amount, text)) = args.split_first() else {
        return Err("Usage: add <amount> <description>".to_string());
    };

    let draft = TransactionDraft::new(text.join(" "), *amount);
    let created = store.create(&draft).await.map_err(|e| e.to_string())?;

    Ok(format!(
        "➕ {} ({}) · balance {}",
        created.text,
        created.amount,
        format_money(store.metrics().balance)
    ))
}
