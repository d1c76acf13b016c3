use super::resolve_id;
use crate::api::TransactionService;
use crate::services::LedgerStore;

pub async fn execute<S: TransactionService>(
    store: &LedgerStore<S>,
    args: &[&str],
) -> Result<String, String> {
    let [reference] = args else {
        return Err("Usage: delete <#row|id>".to_string());
    };

    let id = resolve_id(store, reference)?;
    store.delete(&id).await.map_err(|e| e.to_string())?;

    Ok(format!("🗑️ Removed {}, {} left", id, store.transactions().len()))
}
