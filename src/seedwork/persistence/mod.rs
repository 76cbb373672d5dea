// ============================================================================
// Persistence - unit of work and its backends
// ============================================================================

pub mod in_memory;
pub mod postgres;
pub mod unit_of_work;

pub use in_memory::{InMemoryUnitOfWork, TransactionalStore};
pub use postgres::{SqlxConnection, SqlxUnitOfWork};
pub use unit_of_work::{AggregateTracker, TrackedAggregate, UnitOfWork, UnitOfWorkExt};
