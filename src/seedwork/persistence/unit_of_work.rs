use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::seedwork::domain::{AggregateRoot, DomainEvent, EventSource};

// ============================================================================
// Unit of Work - transaction boundary coordinator
// ============================================================================
//
// idle --start()--> active --commit()/rollback()--> idle
//
// Repositories attached to a unit of work run every read and write on the
// same transaction handle while it is active, and register each aggregate
// they persist so the application service can publish its events.
//
// ============================================================================

/// Snapshot of an aggregate's pending events taken when it was persisted.
///
/// Events emitted after the last repository write are not in the snapshot,
/// so use cases persist an aggregate after its final mutation. The caller's
/// own copy keeps its events after they are published.
#[derive(Debug, Clone)]
pub struct TrackedAggregate {
    pub aggregate_type: &'static str,
    pub aggregate_id: String,
    events: Vec<Arc<dyn DomainEvent>>,
}

impl TrackedAggregate {
    pub fn capture<A: AggregateRoot>(aggregate: &A) -> Self {
        Self {
            aggregate_type: A::ENTITY_NAME,
            aggregate_id: aggregate.entity_id().to_string(),
            events: aggregate.events().to_vec(),
        }
    }
}

impl EventSource for TrackedAggregate {
    fn source_id(&self) -> String {
        format!("{}:{}", self.aggregate_type, self.aggregate_id)
    }

    fn uncommitted_events(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn commit(&self) -> Result<()>;

    async fn rollback(&self) -> Result<()>;

    async fn is_active(&self) -> bool;

    /// Re-registering the same aggregate replaces its earlier snapshot.
    async fn add_aggregate_root(&self, aggregate: TrackedAggregate);

    async fn aggregate_roots(&self) -> Vec<TrackedAggregate>;
}

/// `execute` runs `work` inside a transaction, joining an active one.
#[async_trait]
pub trait UnitOfWorkExt {
    async fn execute<F, Fut, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send;
}

#[async_trait]
impl<U: UnitOfWork + ?Sized> UnitOfWorkExt for U {
    async fn execute<F, Fut, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        if self.is_active().await {
            return work().await;
        }

        self.start().await?;

        match work().await {
            Ok(result) => {
                self.commit().await?;
                Ok(result)
            }
            Err(error) => {
                if let Err(rollback_error) = self.rollback().await {
                    tracing::error!(error = %rollback_error, "Rollback failed after unit of work error");
                }
                Err(error)
            }
        }
    }
}

// ============================================================================
// Aggregate Tracker - shared by every unit of work implementation
// ============================================================================

#[derive(Debug, Default)]
pub struct AggregateTracker {
    tracked: Mutex<Vec<TrackedAggregate>>,
}

impl AggregateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, aggregate: TrackedAggregate) {
        let mut tracked = self.tracked.lock().await;
        match tracked.iter_mut().find(|existing| {
            existing.aggregate_type == aggregate.aggregate_type && existing.aggregate_id == aggregate.aggregate_id
        }) {
            Some(existing) => *existing = aggregate,
            None => tracked.push(aggregate),
        }
    }

    pub async fn snapshot(&self) -> Vec<TrackedAggregate> {
        self.tracked.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.tracked.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seedwork::domain::{AggregateState, Entity};
    use chrono::{DateTime, Utc};
    use std::any::Any;

    #[derive(Debug)]
    struct Touched {
        id: String,
        at: DateTime<Utc>,
    }

    impl DomainEvent for Touched {
        fn event_name(&self) -> &'static str {
            "Touched"
        }
        fn aggregate_id(&self) -> String {
            self.id.clone()
        }
        fn occurred_on(&self) -> DateTime<Utc> {
            self.at
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Thing {
        id: String,
        state: AggregateState<Thing>,
    }

    impl Entity for Thing {
        type Id = String;
        const ENTITY_NAME: &'static str = "Thing";
        fn entity_id(&self) -> &String {
            &self.id
        }
    }

    impl AggregateRoot for Thing {
        fn state(&self) -> &AggregateState<Self> {
            &self.state
        }
        fn state_mut(&mut self) -> &mut AggregateState<Self> {
            &mut self.state
        }
    }

    fn touched(thing: &mut Thing) {
        let id = thing.id.clone();
        thing.emit_event(Touched { id, at: Utc::now() });
    }

    #[tokio::test]
    async fn test_tracker_replaces_snapshot_of_same_aggregate() {
        let tracker = AggregateTracker::new();
        let mut thing = Thing { id: "t-1".into(), state: AggregateState::new() };

        touched(&mut thing);
        tracker.add(TrackedAggregate::capture(&thing)).await;
        touched(&mut thing);
        tracker.add(TrackedAggregate::capture(&thing)).await;

        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].uncommitted_events().len(), 2);
        assert_eq!(snapshot[0].source_id(), "Thing:t-1");
    }

    #[tokio::test]
    async fn test_capture_ignores_events_emitted_afterwards() {
        let mut thing = Thing { id: "t-1".into(), state: AggregateState::new() };
        touched(&mut thing);
        let captured = TrackedAggregate::capture(&thing);

        touched(&mut thing);
        assert_eq!(captured.uncommitted_events().len(), 1);
        assert_eq!(thing.events().len(), 2);
    }

    #[tokio::test]
    async fn test_tracker_clear() {
        let tracker = AggregateTracker::new();
        let thing = Thing { id: "t-1".into(), state: AggregateState::new() };
        tracker.add(TrackedAggregate::capture(&thing)).await;
        tracker.clear().await;
        assert!(tracker.snapshot().await.is_empty());
    }
}
