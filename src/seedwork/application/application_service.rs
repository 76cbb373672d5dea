use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use crate::metrics::Metrics;
use crate::seedwork::eventing::DomainEventMediator;
use crate::seedwork::persistence::UnitOfWork;

// ============================================================================
// Application Service - use case lifecycle around the unit of work
// ============================================================================
//
// run(body):
//   start()                      open a transaction, or join the active one
//   body()                       repositories register what they persist
//   Ok  -> finish()              publish domain events, commit,
//                                then publish integration events
//   Err -> fail()                roll back, return the body's error unchanged
//
// A joined run leaves publishing and committing to the run that opened the
// transaction. Errors from finish() are returned as-is: they are not rolled
// back here, the transaction stays open on the unit of work.
//
// ============================================================================

pub struct ApplicationService {
    uow: Arc<dyn UnitOfWork>,
    mediator: Arc<DomainEventMediator>,
    metrics: Option<Arc<Metrics>>,
}

impl ApplicationService {
    pub fn new(uow: Arc<dyn UnitOfWork>, mediator: Arc<DomainEventMediator>) -> Self {
        Self {
            uow,
            mediator,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn unit_of_work(&self) -> &Arc<dyn UnitOfWork> {
        &self.uow
    }

    /// Returns true when this call opened the transaction.
    pub async fn start(&self) -> Result<bool> {
        if self.uow.is_active().await {
            return Ok(false);
        }
        self.uow.start().await?;
        Ok(true)
    }

    pub async fn finish(&self) -> Result<()> {
        let aggregates = self.uow.aggregate_roots().await;

        for aggregate in &aggregates {
            self.mediator.publish(aggregate).await?;
        }

        self.uow.commit().await?;
        if let Some(metrics) = &self.metrics {
            metrics.record_unit_of_work(true);
        }
        tracing::info!(aggregates = aggregates.len(), "Unit of work committed");

        for aggregate in &aggregates {
            self.mediator.publish_integration_events(aggregate).await?;
        }

        Ok(())
    }

    pub async fn fail(&self) -> Result<()> {
        self.uow.rollback().await?;
        if let Some(metrics) = &self.metrics {
            metrics.record_unit_of_work(false);
        }
        tracing::warn!("Unit of work rolled back");
        Ok(())
    }

    pub async fn run<F, Fut, T>(&self, body: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let owns_transaction = self.start().await?;

        match body().await {
            Ok(result) => {
                if owns_transaction {
                    self.finish().await?;
                }
                Ok(result)
            }
            Err(error) => {
                if owns_transaction {
                    if let Err(rollback_error) = self.fail().await {
                        tracing::error!(error = %rollback_error, "Rollback failed after use case error");
                    }
                }
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seedwork::domain::{
        AggregateRoot, AggregateState, DomainEvent, Entity, IntegrationEvent, InvalidArgumentError,
    };
    use crate::seedwork::eventing::{DomainEventHandler, IntegrationEventHandler};
    use crate::seedwork::persistence::{InMemoryUnitOfWork, TrackedAggregate};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use std::any::Any;
    use tokio::sync::Mutex;

    #[derive(Debug)]
    struct Published {
        id: String,
        at: DateTime<Utc>,
    }

    impl DomainEvent for Published {
        fn event_name(&self) -> &'static str {
            "Published"
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
        fn integration_event(&self) -> Option<IntegrationEvent> {
            Some(IntegrationEvent::new("PublishedIntegrationEvent", self.at, json!({"resource_id": self.id})))
        }
    }

    struct Article {
        id: String,
        state: AggregateState<Article>,
    }

    impl Entity for Article {
        type Id = String;
        const ENTITY_NAME: &'static str = "Article";
        fn entity_id(&self) -> &String {
            &self.id
        }
    }

    impl AggregateRoot for Article {
        fn state(&self) -> &AggregateState<Self> {
            &self.state
        }
        fn state_mut(&mut self) -> &mut AggregateState<Self> {
            &mut self.state
        }
    }

    fn published_article(id: &str) -> Article {
        let mut article = Article { id: id.into(), state: AggregateState::new() };
        article.emit_event(Published { id: id.into(), at: Utc::now() });
        article
    }

    /// Records the order of domain dispatch, integration dispatch and commit.
    struct Journal {
        uow: Arc<InMemoryUnitOfWork>,
        entries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DomainEventHandler for Journal {
        async fn handle(&self, event: Arc<dyn DomainEvent>) -> Result<()> {
            let active = self.uow.is_active().await;
            self.entries.lock().await.push(format!("domain:{}:active={active}", event.event_name()));
            Ok(())
        }
    }

    #[async_trait]
    impl IntegrationEventHandler for Journal {
        async fn handle(&self, event: &IntegrationEvent) -> Result<()> {
            let active = self.uow.is_active().await;
            self.entries.lock().await.push(format!("integration:{}:active={active}", event.event_name));
            Ok(())
        }
    }

    async fn service_with_journal() -> (ApplicationService, Arc<InMemoryUnitOfWork>, Arc<Journal>) {
        let uow = Arc::new(InMemoryUnitOfWork::new());
        let journal = Arc::new(Journal { uow: uow.clone(), entries: Mutex::new(Vec::new()) });
        let mediator = Arc::new(DomainEventMediator::new());
        mediator.register("Published", journal.clone()).await;
        mediator.register_integration("PublishedIntegrationEvent", journal.clone()).await;

        (ApplicationService::new(uow.clone(), mediator), uow, journal)
    }

    #[tokio::test]
    async fn test_run_publishes_before_commit_and_integration_after() {
        let (service, uow, journal) = service_with_journal().await;

        let inner = uow.clone();
        let value = service
            .run(|| async move {
                inner.add_aggregate_root(TrackedAggregate::capture(&published_article("a-1"))).await;
                Ok(7)
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert!(!uow.is_active().await);
        assert_eq!(
            *journal.entries.lock().await,
            vec![
                "domain:Published:active=true".to_string(),
                "integration:PublishedIntegrationEvent:active=false".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_rolls_back_and_returns_original_error() {
        let (service, uow, journal) = service_with_journal().await;
        let metrics = Arc::new(Metrics::new().unwrap());
        let service = service.with_metrics(metrics.clone());

        let inner = uow.clone();
        let err = service
            .run(|| async move {
                inner.add_aggregate_root(TrackedAggregate::capture(&published_article("a-1"))).await;
                Err::<(), _>(anyhow::Error::new(InvalidArgumentError("bad input".into())))
            })
            .await
            .unwrap_err();

        assert_eq!(err.downcast_ref::<InvalidArgumentError>(), Some(&InvalidArgumentError("bad input".into())));
        assert!(!uow.is_active().await);
        assert!(journal.entries.lock().await.is_empty());
        assert_eq!(metrics.unit_of_work_rollbacks.get(), 1);
        assert_eq!(metrics.unit_of_work_commits.get(), 0);
    }

    #[tokio::test]
    async fn test_aggregate_added_while_idle_is_not_published() {
        let (service, uow, journal) = service_with_journal().await;

        uow.add_aggregate_root(TrackedAggregate::capture(&published_article("stale"))).await;
        service.run(|| async { Ok(()) }).await.unwrap();

        assert!(journal.entries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_joined_run_leaves_publish_and_commit_to_owner() {
        let (service, uow, journal) = service_with_journal().await;

        uow.start().await.unwrap();
        let inner = uow.clone();
        service
            .run(|| async move {
                inner.add_aggregate_root(TrackedAggregate::capture(&published_article("a-1"))).await;
                Ok(())
            })
            .await
            .unwrap();

        assert!(uow.is_active().await);
        assert!(journal.entries.lock().await.is_empty());

        service.finish().await.unwrap();
        assert!(!uow.is_active().await);
        assert_eq!(journal.entries.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_finish_error_leaves_transaction_open() {
        struct Veto;

        #[async_trait]
        impl DomainEventHandler for Veto {
            async fn handle(&self, _event: Arc<dyn DomainEvent>) -> Result<()> {
                anyhow::bail!("vetoed")
            }
        }

        let uow = Arc::new(InMemoryUnitOfWork::new());
        let mediator = Arc::new(DomainEventMediator::new());
        mediator.register("Published", Arc::new(Veto)).await;
        let service = ApplicationService::new(uow.clone(), mediator);

        let inner = uow.clone();
        let err = service
            .run(|| async move {
                inner.add_aggregate_root(TrackedAggregate::capture(&published_article("a-1"))).await;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "vetoed");
        assert!(uow.is_active().await);
        uow.rollback().await.unwrap();
    }
}
