// ============================================================================
// Seedwork - infrastructure shared by every catalog aggregate
// ============================================================================

pub mod application;
pub mod domain;
pub mod eventing;
pub mod persistence;
pub mod repository;
pub mod search;
