pub mod mediator;

pub use mediator::{DomainEventHandler, DomainEventMediator, IntegrationEventHandler};
