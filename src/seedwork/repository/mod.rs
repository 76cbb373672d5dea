// ============================================================================
// Repositories - contracts, sorting and the in-memory backend
// ============================================================================

pub mod contract;
pub mod in_memory;
pub mod sort;
pub mod sql;

pub use contract::{ExistsByIdResult, Repository, SearchableRepository};
pub use in_memory::{InMemorySearch, InMemorySearchableRepository, InMemoryStore};
pub use sort::{Dialect, SortClauseBuilder, SortSpec, SortValue};
