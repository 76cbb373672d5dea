use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use super::broker::MessageBroker;
use crate::config::Settings;
use crate::domain::video::VIDEO_MEDIA_UPLOADED_EVENT;
use crate::metrics::Metrics;
use crate::seedwork::domain::IntegrationEvent;
use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState};

// ============================================================================
// Redpanda Broker - Kafka-protocol publisher behind a circuit breaker
// ============================================================================
//
// topic   = routing table lookup by integration event name
// key     = event.routing_key() (payload resource_id, else the event name)
// payload = the integration event as JSON
//
// ============================================================================

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RedpandaBroker {
    producer: FutureProducer,
    circuit_breaker: CircuitBreaker,
    routes: HashMap<String, String>,
}

impl RedpandaBroker {
    pub fn new(brokers: &str, config: CircuitBreakerConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .context("failed to create Redpanda producer")?;

        Ok(Self {
            producer,
            circuit_breaker: CircuitBreaker::new("redpanda", config),
            routes: HashMap::new(),
        })
    }

    /// Producer, breaker and routes as configured by `settings`.
    pub fn from_settings(settings: &Settings, metrics: Option<Arc<Metrics>>) -> Result<Self> {
        let mut broker = Self::new(&settings.kafka_brokers, CircuitBreakerConfig::from_settings(settings))?
            .with_route(VIDEO_MEDIA_UPLOADED_EVENT, &settings.video_events_topic);
        if let Some(metrics) = metrics {
            broker.circuit_breaker = broker.circuit_breaker.with_metrics(metrics);
        }
        Ok(broker)
    }

    pub fn with_route(mut self, event_name: impl Into<String>, topic: impl Into<String>) -> Self {
        self.routes.insert(event_name.into(), topic.into());
        self
    }

    pub fn topic_for(&self, event_name: &str) -> Option<&str> {
        self.routes.get(event_name).map(String::as_str)
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state().await
    }

    pub async fn reset_circuit_breaker(&self) {
        self.circuit_breaker.reset().await;
    }
}

#[async_trait]
impl MessageBroker for RedpandaBroker {
    async fn publish_event(&self, event: &IntegrationEvent) -> Result<()> {
        let topic = self
            .topic_for(&event.event_name)
            .ok_or_else(|| anyhow!("no topic configured for {}", event.event_name))?;
        let key = event.routing_key();
        let payload = serde_json::to_string(event)?;

        let result = self
            .circuit_breaker
            .call(async {
                let record = FutureRecord::to(topic).key(&key).payload(&payload);
                self.producer
                    .send(record, Timeout::After(SEND_TIMEOUT))
                    .await
                    .map_err(|(e, _)| anyhow!("Kafka send error: {e}"))
            })
            .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    topic = topic,
                    key = %key,
                    event = %event.event_name,
                    "Published to Redpanda"
                );
                Ok(())
            }
            Err(CircuitBreakerError::Open) => {
                tracing::error!(topic = topic, event = %event.event_name, "Circuit breaker open - Redpanda unavailable");
                Err(anyhow!("circuit breaker open for Redpanda"))
            }
            Err(CircuitBreakerError::OperationFailed(e)) => {
                tracing::error!(error = %e, topic = topic, "Failed to publish to Redpanda");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "VIDEO_EVENTS_TOPIC" => Some("videos.encode".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_routes_media_uploaded_to_configured_topic() {
        // Creating a producer does not connect; no broker needed
        let broker = RedpandaBroker::from_settings(&settings(), None).unwrap();

        assert_eq!(broker.topic_for(VIDEO_MEDIA_UPLOADED_EVENT), Some("videos.encode"));
        assert_eq!(broker.topic_for("SomethingElse"), None);
        assert_eq!(broker.circuit_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_unrouted_event_fails_without_sending() {
        let broker = RedpandaBroker::from_settings(&settings(), None).unwrap();
        let event = IntegrationEvent::new("Unrouted", Utc::now(), json!({}));

        let err = broker.publish_event(&event).await.unwrap_err();
        assert!(err.to_string().contains("no topic configured for Unrouted"));
        assert_eq!(broker.circuit_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    #[ignore = "requires a running Redpanda/Kafka (KAFKA_BROKERS)"]
    async fn test_publish_to_running_broker() {
        let settings = Settings::from_env().unwrap();
        let broker = RedpandaBroker::from_settings(&settings, None).unwrap();
        let event = IntegrationEvent::new(
            VIDEO_MEDIA_UPLOADED_EVENT,
            Utc::now(),
            json!({"resource_id": "video-1.video", "file_path": "videos/raw/movie.mp4"}),
        );

        broker.publish_event(&event).await.unwrap();
    }
}
