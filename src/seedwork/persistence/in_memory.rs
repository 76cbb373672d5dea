use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::unit_of_work::{AggregateTracker, TrackedAggregate, UnitOfWork};
use crate::seedwork::domain::InvalidArgumentError;

// ============================================================================
// In-Memory Unit of Work
// ============================================================================
//
// Stores that join the unit of work take a snapshot on `start`, drop it on
// `commit` and restore it on `rollback`, which gives the in-memory backend
// the same all-or-nothing behaviour as a database transaction. Aggregates
// persisted while no transaction is open are not tracked.
//
// ============================================================================

#[async_trait]
pub trait TransactionalStore: Send + Sync {
    async fn begin(&self);

    async fn commit(&self);

    async fn rollback(&self);
}

#[derive(Default)]
pub struct InMemoryUnitOfWork {
    active: Mutex<bool>,
    stores: Mutex<Vec<Arc<dyn TransactionalStore>>>,
    tracker: AggregateTracker,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_store(&self, store: Arc<dyn TransactionalStore>) {
        // Joining mid-transaction still needs a snapshot to roll back to
        if *self.active.lock().await {
            store.begin().await;
        }
        self.stores.lock().await.push(store);
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn start(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        if *active {
            bail!(InvalidArgumentError("Transaction already started".to_string()));
        }

        for store in self.stores.lock().await.iter() {
            store.begin().await;
        }
        *active = true;
        self.tracker.clear().await;

        tracing::debug!("In-memory transaction started");
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        if !*active {
            bail!(InvalidArgumentError("No transaction started".to_string()));
        }

        for store in self.stores.lock().await.iter() {
            store.commit().await;
        }
        *active = false;
        self.tracker.clear().await;

        tracing::debug!("In-memory transaction committed");
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        if !*active {
            bail!(InvalidArgumentError("No transaction started".to_string()));
        }

        for store in self.stores.lock().await.iter() {
            store.rollback().await;
        }
        *active = false;
        self.tracker.clear().await;

        tracing::debug!("In-memory transaction rolled back");
        Ok(())
    }

    async fn is_active(&self) -> bool {
        *self.active.lock().await
    }

    async fn add_aggregate_root(&self, aggregate: TrackedAggregate) {
        if !*self.active.lock().await {
            tracing::trace!(
                aggregate_type = aggregate.aggregate_type,
                aggregate_id = %aggregate.aggregate_id,
                "No active transaction, aggregate not tracked"
            );
            return;
        }
        self.tracker.add(aggregate).await;
    }

    async fn aggregate_roots(&self) -> Vec<TrackedAggregate> {
        self.tracker.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seedwork::persistence::UnitOfWorkExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        begins: AtomicUsize,
        commits: AtomicUsize,
        rollbacks: AtomicUsize,
    }

    #[async_trait]
    impl TransactionalStore for CountingStore {
        async fn begin(&self) {
            self.begins.fetch_add(1, Ordering::SeqCst);
        }
        async fn commit(&self) {
            self.commits.fetch_add(1, Ordering::SeqCst);
        }
        async fn rollback(&self) {
            self.rollbacks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let uow = InMemoryUnitOfWork::new();
        assert!(!uow.is_active().await);

        uow.start().await.unwrap();
        assert!(uow.is_active().await);
        assert!(uow.start().await.is_err());

        uow.commit().await.unwrap();
        assert!(!uow.is_active().await);
        assert!(uow.commit().await.is_err());
        assert!(uow.rollback().await.is_err());
    }

    #[tokio::test]
    async fn test_execute_commits_on_success() {
        let uow = InMemoryUnitOfWork::new();
        let store = Arc::new(CountingStore::default());
        uow.register_store(store.clone()).await;

        let value = uow.execute(|| async { Ok(42) }).await.unwrap();

        assert_eq!(value, 42);
        assert_eq!(store.begins.load(Ordering::SeqCst), 1);
        assert_eq!(store.commits.load(Ordering::SeqCst), 1);
        assert_eq!(store.rollbacks.load(Ordering::SeqCst), 0);
        assert!(!uow.is_active().await);
    }

    #[tokio::test]
    async fn test_execute_rolls_back_and_rethrows_original_error() {
        let uow = InMemoryUnitOfWork::new();
        let store = Arc::new(CountingStore::default());
        uow.register_store(store.clone()).await;

        let err = uow
            .execute(|| async { Err::<(), _>(anyhow::Error::new(InvalidArgumentError("boom".into()))) })
            .await
            .unwrap_err();

        assert_eq!(err.downcast_ref::<InvalidArgumentError>(), Some(&InvalidArgumentError("boom".into())));
        assert_eq!(store.rollbacks.load(Ordering::SeqCst), 1);
        assert_eq!(store.commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_joins_active_transaction() {
        let uow = InMemoryUnitOfWork::new();
        let store = Arc::new(CountingStore::default());
        uow.register_store(store.clone()).await;

        uow.start().await.unwrap();
        uow.execute(|| async { Ok(()) }).await.unwrap();

        // Joined work neither commits nor rolls back
        assert!(uow.is_active().await);
        assert_eq!(store.commits.load(Ordering::SeqCst), 0);

        uow.rollback().await.unwrap();
        assert_eq!(store.rollbacks.load(Ordering::SeqCst), 1);
    }

    fn tracked(name: &str) -> TrackedAggregate {
        use crate::domain::category::{Category, CategoryId};

        let category = Category::restore(CategoryId::new(), name, None, true, chrono::Utc::now());
        TrackedAggregate::capture(&category)
    }

    #[tokio::test]
    async fn test_aggregates_are_tracked_only_inside_transaction() {
        let uow = InMemoryUnitOfWork::new();

        uow.add_aggregate_root(tracked("idle")).await;
        assert!(uow.aggregate_roots().await.is_empty());

        uow.start().await.unwrap();
        uow.add_aggregate_root(tracked("inside")).await;
        assert_eq!(uow.aggregate_roots().await.len(), 1);

        uow.rollback().await.unwrap();
        assert!(uow.aggregate_roots().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_registered_mid_transaction_gets_snapshot() {
        let uow = InMemoryUnitOfWork::new();
        uow.start().await.unwrap();

        let store = Arc::new(CountingStore::default());
        uow.register_store(store.clone()).await;

        assert_eq!(store.begins.load(Ordering::SeqCst), 1);
    }
}
