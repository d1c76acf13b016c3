use crate::api::TransactionService;
use crate::services::LedgerStore;

pub async fn execute<S: TransactionService>(store: &LedgerStore<S>) -> Result<String, String> {
    store.refresh().await.map_err(|e| e.to_string())?;
    Ok(format!("🔄 {} transactions loaded", store.transactions().len()))
}
