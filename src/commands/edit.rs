use super::resolve_id;
use crate::api::TransactionService;
use crate::models::TransactionDraft;
use crate::services::LedgerStore;

pub async fn execute<S: TransactionService>(
    store: &LedgerStore<S>,
    args: &[&str],
) -> Result<String, String> {
    let [reference, amount, text @ ..] = args else {
        return Err("Usage: edit <#row|id> <amount> [description]".to_string());
    };

    let id = resolve_id(store, reference)?;

    // like a prefilled form: no new description keeps the current one
    let text = if text.is_empty() {
        store
            .transactions()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.text.clone())
            .ok_or_else(|| format!("No transaction with id {} in the list", id))?
    } else {
        text.join(" ")
    };

    let draft = TransactionDraft::new(text, *amount);
    let updated = store.update(&id, &draft).await.map_err(|e| e.to_string())?;

    Ok(format!("✏️ {} is now {} ({})", id, updated.text, updated.amount))
}
