// ============================================================================
// Domain Layer - catalog aggregates
// ============================================================================
//
// Each aggregate has its own subdirectory with:
// - Value objects
// - Events
// - Commands
// - Aggregate implementation
// - Repositories
// - Command handler
//
// Shared building blocks (unit of work, mediator, search) live in seedwork.
//
// ============================================================================

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod video;
