//! Session store for the transaction list
//!
//! [`LedgerStore`] is the only owner of the in-memory list and the only path
//! to the remote service. Every mutation follows the same shape:
//!
//! 1. validate locally, failing before any network call;
//! 2. send the request to the remote service;
//! 3. re-fetch the whole list with [`LedgerStore::refresh`].
//!
//! Step 3 is what keeps the client in line with the server: records are
//! never spliced in locally, so ids, timestamps and server-side defaults
//! always come from the server. The list is swapped wholesale through a
//! `watch` channel, so subscribers observe either the old list or the new
//! one.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, TransactionPayload, TransactionService};
use crate::models::{Metrics, Notification, Transaction, TransactionDraft, TransactionId};
use crate::services::metrics_service;
use crate::services::notifier::{NotificationSink, TracingSink};
use crate::utils::errors::LedgerError;

pub const FETCH_SUCCESS: &str = "Transactions fetched successfully";
pub const FETCH_FAILURE: &str = "Failed to fetch transactions";
pub const CREATE_INVALID: &str = "Please fill in all fields";
pub const CREATE_OVERDRAFT: &str = "Expense exceeds the available balance";
pub const CREATE_SUCCESS: &str = "Transaction added successfully";
pub const CREATE_FAILURE: &str = "Failed to add the transaction";
pub const UPDATE_INVALID: &str = "Please fill all fields correctly";
pub const UPDATE_SUCCESS: &str = "Transaction updated successfully";
pub const UPDATE_FAILURE: &str = "Failed to update transaction";
pub const DELETE_SUCCESS: &str = "Transaction deleted successfully";
pub const DELETE_FAILURE: &str = "Failed to delete the transaction";

/// Shared, immutable snapshot of the transaction list
pub type Snapshot = Arc<[Transaction]>;

pub struct LedgerStore<S> {
    service: S,
    notifier: Box<dyn NotificationSink>,
    transactions: watch::Sender<Snapshot>,
    pending: AtomicUsize,
    fetched_once: AtomicBool,
}

/// Marks a mutation as in flight until dropped
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S: TransactionService> LedgerStore<S> {
    /// Empty store that reports outcomes to the log
    pub fn new(service: S) -> Self {
        Self::with_notifier(service, TracingSink)
    }

    pub fn with_notifier(service: S, notifier: impl NotificationSink + 'static) -> Self {
        let (transactions, _) = watch::channel(Snapshot::from(Vec::new()));
        Self {
            service,
            notifier: Box::new(notifier),
            transactions,
            pending: AtomicUsize::new(0),
            fetched_once: AtomicBool::new(false),
        }
    }

    /// Current list, in the order the remote service returned it
    pub fn transactions(&self) -> Snapshot {
        self.transactions.borrow().clone()
    }

    /// Metrics of the current list, recomputed on every call
    pub fn metrics(&self) -> Metrics {
        metrics_service::compute_metrics(&self.transactions.borrow())
    }

    /// Receiver that is updated each time the list is replaced
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.transactions.subscribe()
    }

    /// True while a mutation is waiting on the remote service
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Fetch the full list and replace the local one.
    ///
    /// On failure the previous list stays in place. Only the first successful
    /// fetch of the session is announced; every failure is.
    pub async fn refresh(&self) -> Result<(), LedgerError> {
        let transactions = match self.service.list().await {
            Ok(transactions) => transactions,
            Err(e) => {
                error!("Error fetching transactions: {}", e);
                self.notify(Notification::failure(FETCH_FAILURE));
                return Err(e.into());
            }
        };

        warn_on_duplicate_ids(&transactions);
        debug!("Fetched {} transactions", transactions.len());
        self.transactions.send_replace(transactions.into());

        if !self.fetched_once.swap(true, Ordering::SeqCst) {
            self.notify(Notification::success(FETCH_SUCCESS));
        }
        Ok(())
    }

    /// Re-fetch after a successful mutation.
    ///
    /// The mutation already happened remotely, so a failed re-fetch does not
    /// undo its success; `refresh` has reported the failure on its own.
    async fn resync(&self) {
        if let Err(e) = self.refresh().await {
            warn!("List is stale after mutation: {}", e);
        }
    }

    /// Create a transaction from a form draft.
    ///
    /// Fails without a network call when the draft is invalid or when an
    /// expense is larger than the current balance.
    pub async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, LedgerError> {
        let valid = match draft.validate() {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Rejected new transaction: {}", e);
                self.notify(Notification::failure(CREATE_INVALID));
                return Err(e.into());
            }
        };

        let balance = self.metrics().balance;
        if valid.amount < 0.0 && valid.amount.abs() > balance {
            debug!(
                "Rejected expense of {} against balance of {}",
                valid.amount, balance
            );
            self.notify(Notification::failure(CREATE_OVERDRAFT));
            return Err(LedgerError::InsufficientBalance {
                amount: valid.amount,
                balance,
            });
        }

        let _pending = PendingGuard::enter(&self.pending);
        let payload = TransactionPayload {
            text: valid.text,
            amount: valid.amount,
        };

        let created = match self.service.create(&payload).await {
            Ok(created) => created,
            Err(e) => return Err(self.mutation_failed("adding", CREATE_FAILURE, e)),
        };

        self.resync().await;
        info!("Added transaction {}", created.id);
        self.notify(Notification::success(CREATE_SUCCESS));
        Ok(created)
    }

    /// Replace the text and amount of an existing transaction.
    ///
    /// Unlike [`create`](Self::create) there is no balance check here.
    pub async fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, LedgerError> {
        let valid = match draft.validate() {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Rejected edit of {}: {}", id, e);
                self.notify(Notification::failure(UPDATE_INVALID));
                return Err(e.into());
            }
        };

        let _pending = PendingGuard::enter(&self.pending);
        let payload = TransactionPayload {
            text: valid.text,
            amount: valid.amount,
        };

        let updated = match self.service.update(id, &payload).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.mutation_failed("updating", UPDATE_FAILURE, e)),
        };

        self.resync().await;
        info!("Updated transaction {}", id);
        self.notify(Notification::success(UPDATE_SUCCESS));
        Ok(updated)
    }

    pub async fn delete(&self, id: &TransactionId) -> Result<(), LedgerError> {
        let _pending = PendingGuard::enter(&self.pending);

        if let Err(e) = self.service.delete(id).await {
            return Err(self.mutation_failed("deleting", DELETE_FAILURE, e));
        }

        self.resync().await;
        info!("Deleted transaction {}", id);
        self.notify(Notification::success(DELETE_SUCCESS));
        Ok(())
    }

    fn mutation_failed(&self, action: &str, message: &str, e: ApiError) -> LedgerError {
        error!("Error {} transaction: {}", action, e);
        self.notify(Notification::failure(message));
        e.into()
    }
}

fn warn_on_duplicate_ids(transactions: &[Transaction]) {
    let mut seen = HashSet::with_capacity(transactions.len());
    for t in transactions {
        if !seen.insert(&t.id) {
            warn!("Remote list contains duplicate id {}", t.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryService;
    use crate::models::{NotificationLevel, ValidationError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
    use tokio::sync::Semaphore;

    /// Wraps the in-memory service, records every remote call and can be
    /// told to fail them.
    #[derive(Default)]
    struct RecordingService {
        inner: InMemoryService,
        calls: Mutex<Vec<&'static str>>,
        offline: AtomicBool,
        list_offline: AtomicBool,
    }

    impl RecordingService {
        fn seeded(amounts: &[f64]) -> Self {
            let transactions = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    Transaction::new(
                        (i + 1).to_string(),
                        format!("seed {}", i + 1),
                        *a,
                        "2025-08-05T13:45:00Z",
                    )
                })
                .collect();
            Self {
                inner: InMemoryService::with_transactions(transactions),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            let offline = self.offline.load(Ordering::SeqCst)
                || (call == "list" && self.list_offline.load(Ordering::SeqCst));
            if offline {
                Err(ApiError::RequestError("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TransactionService for RecordingService {
        async fn list(&self) -> Result<Vec<Transaction>, ApiError> {
            self.record("list")?;
            self.inner.list().await
        }

        async fn create(&self, payload: &TransactionPayload) -> Result<Transaction, ApiError> {
            self.record("create")?;
            self.inner.create(payload).await
        }

        async fn update(
            &self,
            id: &TransactionId,
            payload: &TransactionPayload,
        ) -> Result<Transaction, ApiError> {
            self.record("update")?;
            self.inner.update(id, payload).await
        }

        async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
            self.record("delete")?;
            self.inner.delete(id).await
        }
    }

    type TestStore = LedgerStore<Arc<RecordingService>>;

    async fn loaded_store(
        amounts: &[f64],
    ) -> (TestStore, Arc<RecordingService>, UnboundedReceiver<Notification>) {
        let service = Arc::new(RecordingService::seeded(amounts));
        let (tx, mut rx) = unbounded_channel();
        let store = LedgerStore::with_notifier(service.clone(), tx);
        store.refresh().await.unwrap();
        // the first-load announcement is not what the tests are about
        assert_eq!(rx.try_recv().unwrap(), Notification::success(FETCH_SUCCESS));
        service.calls.lock().unwrap().clear();
        (store, service, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            out.push(n);
        }
        out
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let store = LedgerStore::new(InMemoryService::new());
        assert!(store.transactions().is_empty());
        assert_eq!(store.metrics(), Metrics::default());
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_refresh_replaces_list_and_metrics() {
        let (store, _, _) = loaded_store(&[100.0, -40.0, 25.0]).await;

        assert_eq!(store.transactions().len(), 3);
        let metrics = store.metrics();
        assert_eq!(metrics.balance, 85.0);
        assert_eq!(metrics.income, 125.0);
        assert_eq!(metrics.expense, -40.0);
    }

    #[tokio::test]
    async fn test_only_first_fetch_is_announced() {
        let (store, _, mut rx) = loaded_store(&[10.0]).await;

        store.refresh().await.unwrap();
        store.refresh().await.unwrap();
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_list() {
        let (store, service, mut rx) = loaded_store(&[10.0, 20.0]).await;
        let before = store.transactions();

        service.offline.store(true, Ordering::SeqCst);
        let err = store.refresh().await.unwrap_err();

        assert!(err.is_fetch_failure());
        assert_eq!(store.transactions(), before);
        assert_eq!(drain(&mut rx), vec![Notification::failure(FETCH_FAILURE)]);
    }

    #[tokio::test]
    async fn test_subscribers_see_wholesale_replacement() {
        let (store, _, _) = loaded_store(&[5.0]).await;
        let mut rx = store.subscribe();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.create(&TransactionDraft::new("Gift", "20")).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);
    }

    #[tokio::test]
    async fn test_create_expense_within_balance() {
        let (store, service, mut rx) = loaded_store(&[100.0]).await;

        let created = store
            .create(&TransactionDraft::new("Coffee", "-4.5"))
            .await
            .unwrap();

        let transactions = store.transactions();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1], created);
        assert_eq!(store.metrics().balance, 95.5);
        assert_eq!(service.calls(), vec!["create", "list"]);
        assert_eq!(drain(&mut rx), vec![Notification::success(CREATE_SUCCESS)]);
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_create_overdraft_rejected_without_network() {
        let (store, service, mut rx) = loaded_store(&[30.0]).await;
        let before = store.transactions();

        let err = store
            .create(&TransactionDraft::new("Dinner", "-50"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                amount: -50.0,
                balance: 30.0
            }
        );
        assert_eq!(store.transactions(), before);
        assert!(service.calls().is_empty());
        assert_eq!(drain(&mut rx), vec![Notification::failure(CREATE_OVERDRAFT)]);
    }

    #[tokio::test]
    async fn test_create_expense_equal_to_balance_allowed() {
        let (store, _, _) = loaded_store(&[30.0]).await;

        store
            .create(&TransactionDraft::new("Everything", "-30"))
            .await
            .unwrap();
        assert_eq!(store.metrics().balance, 0.0);
    }

    #[tokio::test]
    async fn test_create_income_ignores_balance() {
        let (store, _, _) = loaded_store(&[-20.0]).await;

        store.create(&TransactionDraft::new("Refund", "5")).await.unwrap();
        assert_eq!(store.transactions().len(), 2);
    }

    #[tokio::test]
    async fn test_create_validation_short_circuits() {
        let (store, service, mut rx) = loaded_store(&[10.0]).await;

        let blank = store.create(&TransactionDraft::new("", "10")).await.unwrap_err();
        let garbage = store.create(&TransactionDraft::new("Lunch", "ten")).await.unwrap_err();

        assert_eq!(blank, LedgerError::Validation(ValidationError::EmptyText));
        assert_eq!(
            garbage,
            LedgerError::Validation(ValidationError::InvalidAmount("ten".to_string()))
        );
        assert!(service.calls().is_empty());
        assert_eq!(
            drain(&mut rx),
            vec![
                Notification::failure(CREATE_INVALID),
                Notification::failure(CREATE_INVALID)
            ]
        );
    }

    #[tokio::test]
    async fn test_create_remote_failure_inserts_nothing() {
        let (store, service, mut rx) = loaded_store(&[10.0]).await;
        let before = store.transactions();

        service.offline.store(true, Ordering::SeqCst);
        let err = store.create(&TransactionDraft::new("Gift", "5")).await.unwrap_err();

        assert!(err.is_fetch_failure());
        assert_eq!(store.transactions(), before);
        assert_eq!(service.calls(), vec!["create"]);
        assert_eq!(drain(&mut rx), vec![Notification::failure(CREATE_FAILURE)]);
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_create_succeeds_even_if_resync_fails() {
        let (store, service, mut rx) = loaded_store(&[10.0]).await;

        service.list_offline.store(true, Ordering::SeqCst);
        store.create(&TransactionDraft::new("Gift", "5")).await.unwrap();

        assert_eq!(store.transactions().len(), 1);
        assert_eq!(service.inner.len().await, 2);
        assert_eq!(
            drain(&mut rx),
            vec![
                Notification::failure(FETCH_FAILURE),
                Notification::success(CREATE_SUCCESS)
            ]
        );
    }

    #[tokio::test]
    async fn test_update_rewrites_record() {
        let (store, service, mut rx) = loaded_store(&[100.0, -40.0]).await;
        let id = TransactionId::from("2");

        store
            .update(&id, &TransactionDraft::new("Groceries", "-60"))
            .await
            .unwrap();

        let transactions = store.transactions();
        assert_eq!(transactions[1].text, "Groceries");
        assert_eq!(store.metrics().balance, 40.0);
        assert_eq!(service.calls(), vec!["update", "list"]);
        assert_eq!(drain(&mut rx), vec![Notification::success(UPDATE_SUCCESS)]);
    }

    #[tokio::test]
    async fn test_update_skips_overdraft_check() {
        let (store, _, _) = loaded_store(&[30.0, -10.0]).await;

        store
            .update(&TransactionId::from("2"), &TransactionDraft::new("Big", "-500"))
            .await
            .unwrap();
        assert_eq!(store.metrics().balance, -470.0);
    }

    #[tokio::test]
    async fn test_update_blank_text_rejected_without_network() {
        let (store, service, mut rx) = loaded_store(&[10.0]).await;
        let before = store.transactions();

        let err = store
            .update(&TransactionId::from("1"), &TransactionDraft::new("", "10"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.transactions(), before);
        assert!(service.calls().is_empty());
        assert_eq!(drain(&mut rx), vec![Notification::failure(UPDATE_INVALID)]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (store, service, mut rx) = loaded_store(&[10.0]).await;
        let before = store.transactions();

        let err = store
            .update(&TransactionId::from("404"), &TransactionDraft::new("x", "1"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.transactions(), before);
        assert_eq!(service.calls(), vec!["update"]);
        assert_eq!(drain(&mut rx), vec![Notification::failure(UPDATE_FAILURE)]);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (store, service, mut rx) = loaded_store(&[10.0, 20.0]).await;

        store.delete(&TransactionId::from("1")).await.unwrap();

        let transactions = store.transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id.as_str(), "2");
        assert_eq!(service.calls(), vec!["delete", "list"]);
        assert_eq!(drain(&mut rx), vec![Notification::success(DELETE_SUCCESS)]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_keeps_list() {
        let (store, _, mut rx) = loaded_store(&[10.0, 20.0]).await;
        let before = store.transactions();

        let err = store.delete(&TransactionId::from("nope")).await.unwrap_err();

        assert!(err.is_fetch_failure());
        assert!(err.is_not_found());
        assert_eq!(store.transactions(), before);
        let notifications = drain(&mut rx);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Failure);
        assert_eq!(notifications[0].message, DELETE_FAILURE);
    }

    #[tokio::test]
    async fn test_serialized_mutations_converge() {
        let (store, service, _) = loaded_store(&[]).await;

        store.create(&TransactionDraft::new("Salary", "1000")).await.unwrap();
        store.create(&TransactionDraft::new("Rent", "-700")).await.unwrap();
        let rent = store.transactions()[1].id.clone();
        store.delete(&rent).await.unwrap();

        assert_eq!(store.transactions().to_vec(), service.inner.list().await.unwrap());
        assert_eq!(store.metrics().balance, 1000.0);
    }

    /// Holds every create until the test hands out a permit
    struct GatedService {
        inner: InMemoryService,
        gate: Semaphore,
        waiting: AtomicUsize,
    }

    #[async_trait]
    impl TransactionService for GatedService {
        async fn list(&self) -> Result<Vec<Transaction>, ApiError> {
            self.inner.list().await
        }

        async fn create(&self, payload: &TransactionPayload) -> Result<Transaction, ApiError> {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await.unwrap();
            self.inner.create(payload).await
        }

        async fn update(
            &self,
            id: &TransactionId,
            payload: &TransactionPayload,
        ) -> Result<Transaction, ApiError> {
            self.inner.update(id, payload).await
        }

        async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_mutations_keep_pending_until_last_finishes() {
        let service = Arc::new(GatedService {
            inner: InMemoryService::new(),
            gate: Semaphore::new(0),
            waiting: AtomicUsize::new(0),
        });
        let store = Arc::new(LedgerStore::new(service.clone()));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.create(&TransactionDraft::new("Allowance", "5")).await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.create(&TransactionDraft::new("Gift", "7")).await }
        });

        while service.waiting.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        assert!(store.is_pending());

        service.gate.add_permits(1);
        while !(first.is_finished() || second.is_finished()) {
            tokio::task::yield_now().await;
        }
        assert!(store.is_pending());

        service.gate.add_permits(1);
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert!(!store.is_pending());
        assert_eq!(store.transactions().to_vec(), service.inner.list().await.unwrap());
        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.metrics().balance, 12.0);
    }
}
