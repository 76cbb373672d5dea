// ============================================================================
// Genre Value Objects
// ============================================================================

crate::identifier!(
    /// Genre identifier
    GenreId
);
