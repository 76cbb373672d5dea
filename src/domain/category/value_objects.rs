// ============================================================================
// Category Value Objects
// ============================================================================

crate::identifier!(
    /// Category identifier
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_id_round_trips_through_display() {
        let id = CategoryId::new();
        assert_eq!(CategoryId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_category_id_rejects_fake_ids() {
        let err = CategoryId::parse("fake id").unwrap_err();
        assert_eq!(err.to_string(), "ID must be a valid UUID: fake id");
    }
}
