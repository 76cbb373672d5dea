use serde::Serialize;

// ============================================================================
// Core Errors - shared by every aggregate and repository
// ============================================================================

/// Identifier string did not match the canonical 36-character layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("ID must be a valid UUID: {0}")]
pub struct InvalidIdentifierError(pub String);

/// An update or delete targeted an aggregate that does not exist.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{entity} Not Found using ID {}", .ids.join(", "))]
pub struct NotFoundError {
    pub entity: &'static str,
    pub ids: Vec<String>,
}

impl NotFoundError {
    pub fn new(entity: &'static str, ids: impl IntoIterator<Item = impl ToString>) -> Self {
        Self {
            entity,
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// API contract misuse (programmer error).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidArgumentError(pub String);

/// A single field with every message collected for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldErrors {
    pub field: String,
    pub messages: Vec<String>,
}

/// Aggregate failed domain validation. Carries the whole notification map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Entity Validation Error: {}", summarize(.errors))]
pub struct EntityValidationError {
    pub errors: Vec<FieldErrors>,
}

impl EntityValidationError {
    pub fn new(errors: Vec<FieldErrors>) -> Self {
        Self { errors }
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }
}

fn summarize(errors: &[FieldErrors]) -> String {
    errors
        .iter()
        .map(|entry| format!("{}: {}", entry.field, entry.messages.join("; ")))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Repository Error - umbrella for every backend
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifierError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to map stored row: {0}")]
    Mapping(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_lists_every_id() {
        let err = NotFoundError::new("Category", ["a", "b"]);
        assert_eq!(err.to_string(), "Category Not Found using ID a, b");
    }

    #[test]
    fn test_entity_validation_error_summary() {
        let err = EntityValidationError::new(vec![FieldErrors {
            field: "name".to_string(),
            messages: vec!["name should not be empty".to_string()],
        }]);

        assert_eq!(err.count(), 1);
        assert!(err.to_string().contains("name should not be empty"));
    }

    #[test]
    fn test_repository_error_is_transparent_for_not_found() {
        let err: RepositoryError = NotFoundError::new("Genre", ["x"]).into();
        assert_eq!(err.to_string(), "Genre Not Found using ID x");
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
