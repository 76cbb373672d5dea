use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Events
// ============================================================================
//
// A domain event is a fact about one aggregate. It is dispatched by its
// concrete name, first to the aggregate's own local handlers, later to the
// mediator's handlers. Some events also know how to build an integration
// event for consumers outside this service.
//
// ============================================================================

pub trait DomainEvent: Send + Sync + fmt::Debug + 'static {
    /// Concrete event name used for dispatch
    fn event_name(&self) -> &'static str;

    /// String form of the owning aggregate's identifier
    fn aggregate_id(&self) -> String;

    fn occurred_on(&self) -> DateTime<Utc>;

    fn event_version(&self) -> u32 {
        1
    }

    fn as_any(&self) -> &dyn Any;

    /// Only events that cross the service boundary override this.
    fn integration_event(&self) -> Option<IntegrationEvent> {
        None
    }
}

impl<'a> dyn DomainEvent + 'a {
    pub fn downcast_ref<E: DomainEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

// ============================================================================
// Integration Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationEvent {
    pub event_name: String,
    pub occurred_on: DateTime<Utc>,
    pub event_version: u32,
    pub payload: serde_json::Value,
}

impl IntegrationEvent {
    pub fn new(event_name: impl Into<String>, occurred_on: DateTime<Utc>, payload: serde_json::Value) -> Self {
        Self {
            event_name: event_name.into(),
            occurred_on,
            event_version: 1,
            payload,
        }
    }

    /// Partition key for the broker: the payload's resource id when present
    pub fn routing_key(&self) -> String {
        self.payload
            .get("resource_id")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.event_name.clone())
    }
}

// ============================================================================
// Event Source - anything the mediator can publish from
// ============================================================================

pub trait EventSource: Send + Sync {
    fn source_id(&self) -> String;

    fn uncommitted_events(&self) -> &[Arc<dyn DomainEvent>];
}
