// ============================================================================
// Seedwork Domain - building blocks shared by every aggregate
// ============================================================================

pub mod aggregate_root;
pub mod errors;
pub mod events;
pub mod notification;
pub mod validation;
pub mod value_object;

pub use aggregate_root::{AggregateEvents, AggregateRoot, AggregateState, Entity, LocalEventHandler};
pub use errors::{
    EntityValidationError, FieldErrors, InvalidArgumentError, InvalidIdentifierError, NotFoundError,
    RepositoryError,
};
pub use events::{DomainEvent, EventSource, IntegrationEvent};
pub use notification::Notification;
pub use validation::{
    validate_into, DefaultValidationProvider, FieldRule, Rule, RuleSet, ValidationProvider, Violation,
};
pub use value_object::{parse_uuid, ValueObject};
