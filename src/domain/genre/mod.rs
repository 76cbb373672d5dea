// ============================================================================
// Genre Domain
// ============================================================================
//
// - Value objects (GenreId)
// - Events (GenreCreated)
// - Commands (create, update)
// - Aggregate (Genre, many-to-many with categories)
// - Repositories (filter, in-memory strategy, Postgres hybrid search)
// - Command Handler (GenreCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod aggregate;
pub mod repository;
pub mod postgres;
pub mod command_handler;

pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use aggregate::*;
pub use repository::*;
pub use postgres::*;
pub use command_handler::*;
