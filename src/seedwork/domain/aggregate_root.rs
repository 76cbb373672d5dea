use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::events::{DomainEvent, EventSource};
use super::notification::Notification;

// ============================================================================
// Entity & Aggregate Root
// ============================================================================
//
// Two-tier event handling:
// 1. `emit_event` appends to the buffer and synchronously runs the local
//    handlers registered on this instance (same-transaction projections).
// 2. The mediator later reads the buffer and fans out to its own handlers.
//
// Local handlers never remove anything from the buffer, so tier 2 always
// sees every event tier 1 saw. Only the holder clears the buffer.
//
// ============================================================================

pub trait Entity: Send + Sync + 'static {
    type Id: Clone + Eq + std::hash::Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Name used in errors and logs, e.g. "Category"
    const ENTITY_NAME: &'static str;

    fn entity_id(&self) -> &Self::Id;
}

/// Synchronous projection run on the aggregate when an event is emitted.
pub type LocalEventHandler<A> = fn(&mut A, &dyn DomainEvent);

pub struct AggregateState<A> {
    events: Vec<Arc<dyn DomainEvent>>,
    local_handlers: HashMap<&'static str, Vec<LocalEventHandler<A>>>,
    notification: Notification,
}

impl<A> AggregateState<A> {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            local_handlers: HashMap::new(),
            notification: Notification::new(),
        }
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn notification_mut(&mut self) -> &mut Notification {
        &mut self.notification
    }
}

impl<A> Default for AggregateState<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for AggregateState<A> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            local_handlers: self.local_handlers.clone(),
            notification: self.notification.clone(),
        }
    }
}

impl<A> fmt::Debug for AggregateState<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateState")
            .field("events", &self.events.iter().map(|e| e.event_name()).collect::<Vec<_>>())
            .field("local_handlers", &self.local_handlers.keys().collect::<Vec<_>>())
            .field("notification", &self.notification)
            .finish()
    }
}

pub trait AggregateRoot: Entity + Sized {
    fn state(&self) -> &AggregateState<Self>;

    fn state_mut(&mut self) -> &mut AggregateState<Self>;

    fn notification(&self) -> &Notification {
        self.state().notification()
    }

    fn register_handler(&mut self, event_name: &'static str, handler: LocalEventHandler<Self>) {
        self.state_mut()
            .local_handlers
            .entry(event_name)
            .or_default()
            .push(handler);
    }

    fn emit_event<E: DomainEvent>(&mut self, event: E) {
        let event: Arc<dyn DomainEvent> = Arc::new(event);
        self.state_mut().events.push(Arc::clone(&event));

        // Copy out the fn pointers so handlers can borrow the aggregate mutably
        let handlers = self
            .state()
            .local_handlers
            .get(event.event_name())
            .cloned()
            .unwrap_or_default();

        for handler in handlers {
            handler(self, event.as_ref());
        }
    }

    fn events(&self) -> &[Arc<dyn DomainEvent>] {
        &self.state().events
    }

    /// Drains the buffer. Only the holder of the aggregate calls this.
    fn clear_events(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        std::mem::take(&mut self.state_mut().events)
    }
}

/// Every aggregate can be published from directly.
pub struct AggregateEvents<'a, A: AggregateRoot>(pub &'a A);

impl<A: AggregateRoot> EventSource for AggregateEvents<'_, A> {
    fn source_id(&self) -> String {
        self.0.entity_id().to_string()
    }

    fn uncommitted_events(&self) -> &[Arc<dyn DomainEvent>] {
        self.0.events()
    }
}
