use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::sync::RwLock;

use crate::metrics::Metrics;
use crate::seedwork::domain::{DomainEvent, EventSource, IntegrationEvent};

// ============================================================================
// Domain Event Mediator - tier 2 of event handling
// ============================================================================
//
// An explicitly constructed registry, shared by reference with the
// application service. Two fan-outs:
//
//   publish                     domain event name      -> DomainEventHandler
//   publish_integration_events  integration event name -> IntegrationEventHandler
//
// Events are processed in buffer order. All handlers of one event run
// concurrently and are all awaited; the first failure is then returned.
// The mediator only reads buffers, it never clears them.
//
// ============================================================================

#[async_trait]
pub trait DomainEventHandler: Send + Sync {
    async fn handle(&self, event: Arc<dyn DomainEvent>) -> Result<()>;
}

#[async_trait]
pub trait IntegrationEventHandler: Send + Sync {
    async fn handle(&self, event: &IntegrationEvent) -> Result<()>;
}

#[derive(Default)]
pub struct DomainEventMediator {
    handlers: RwLock<HashMap<&'static str, Vec<Arc<dyn DomainEventHandler>>>>,
    integration_handlers: RwLock<HashMap<String, Vec<Arc<dyn IntegrationEventHandler>>>>,
    metrics: Option<Arc<Metrics>>,
}

impl DomainEventMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn register(&self, event_name: &'static str, handler: Arc<dyn DomainEventHandler>) {
        self.handlers.write().await.entry(event_name).or_default().push(handler);
        tracing::debug!(event = event_name, "Domain event handler registered");
    }

    pub async fn register_integration(
        &self,
        event_name: impl Into<String>,
        handler: Arc<dyn IntegrationEventHandler>,
    ) {
        let event_name = event_name.into();
        tracing::debug!(event = %event_name, "Integration event handler registered");
        self.integration_handlers.write().await.entry(event_name).or_default().push(handler);
    }

    pub async fn publish(&self, source: &dyn EventSource) -> Result<()> {
        for event in source.uncommitted_events() {
            let handlers = self.handlers_for(event.event_name()).await;
            if handlers.is_empty() {
                continue;
            }

            tracing::debug!(
                source = %source.source_id(),
                event = event.event_name(),
                handlers = handlers.len(),
                "Dispatching domain event"
            );

            let results = join_all(handlers.iter().map(|handler| handler.handle(Arc::clone(event)))).await;

            if let Some(metrics) = &self.metrics {
                metrics.record_domain_event(event.event_name());
            }
            first_error(results, event.event_name())?;
        }

        Ok(())
    }

    pub async fn publish_integration_events(&self, source: &dyn EventSource) -> Result<()> {
        for event in source.uncommitted_events() {
            let Some(integration_event) = event.integration_event() else {
                continue;
            };

            let handlers = self.integration_handlers_for(&integration_event.event_name).await;
            if handlers.is_empty() {
                continue;
            }

            tracing::info!(
                source = %source.source_id(),
                event = %integration_event.event_name,
                handlers = handlers.len(),
                "Dispatching integration event"
            );

            let results = join_all(handlers.iter().map(|handler| handler.handle(&integration_event))).await;

            if let Some(metrics) = &self.metrics {
                metrics.record_integration_event(&integration_event.event_name);
            }
            first_error(results, &integration_event.event_name)?;
        }

        Ok(())
    }

    async fn handlers_for(&self, event_name: &str) -> Vec<Arc<dyn DomainEventHandler>> {
        self.handlers.read().await.get(event_name).cloned().unwrap_or_default()
    }

    async fn integration_handlers_for(&self, event_name: &str) -> Vec<Arc<dyn IntegrationEventHandler>> {
        self.integration_handlers
            .read()
            .await
            .get(event_name)
            .cloned()
            .unwrap_or_default()
    }
}

fn first_error(results: Vec<Result<()>>, event_name: &str) -> Result<()> {
    let mut failures = results.into_iter().filter_map(Result::err);
    match failures.next() {
        Some(error) => {
            let others = failures.count();
            tracing::error!(event = event_name, error = %error, others = others, "Event handler failed");
            Err(error)
        }
        None => Ok(()),
    }
}
