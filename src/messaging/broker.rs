use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::seedwork::domain::IntegrationEvent;

// ============================================================================
// Message Broker - outbound integration events
// ============================================================================

#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn publish_event(&self, event: &IntegrationEvent) -> anyhow::Result<()>;
}

/// Keeps published events in memory, in publish order.
#[derive(Debug, Default)]
pub struct InMemoryMessageBroker {
    published: Mutex<Vec<IntegrationEvent>>,
}

impl InMemoryMessageBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn published(&self) -> Vec<IntegrationEvent> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    async fn publish_event(&self, event: &IntegrationEvent) -> anyhow::Result<()> {
        tracing::debug!(event = %event.event_name, key = %event.routing_key(), "Event kept in memory");
        self.published.lock().await.push(event.clone());
        Ok(())
    }
}
