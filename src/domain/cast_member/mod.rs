// ============================================================================
// Cast Member Domain
// ============================================================================
//
// - Value objects (CastMemberId, CastMemberType)
// - Events (CastMemberCreated)
// - Commands (create, update)
// - Aggregate (CastMember)
// - Repositories (filter, in-memory strategy)
// - Command Handler (CastMemberCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod aggregate;
pub mod repository;
pub mod command_handler;

pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use aggregate::*;
pub use repository::*;
pub use command_handler::*;
