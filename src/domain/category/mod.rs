// ============================================================================
// Category Domain
// ============================================================================
//
// - Value objects (CategoryId)
// - Events (CategoryCreated)
// - Commands (create, update)
// - Aggregate (Category)
// - Repositories (filter, in-memory strategy, Postgres)
// - Command Handler (CategoryCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod aggregate;
pub mod repository;
pub mod postgres;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use aggregate::*;
pub use repository::*;
pub use postgres::*;
pub use command_handler::*;
