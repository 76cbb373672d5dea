use serde::Deserialize;

// ============================================================================
// Category Commands
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreateCommand {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CategoryCreateCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_active: None,
        }
    }
}

/// Only the fields that are present are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpdateCommand {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CategoryUpdateCommand {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            is_active: None,
        }
    }
}
