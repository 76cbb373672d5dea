use serde::Deserialize;

// ============================================================================
// Genre Commands
// ============================================================================
//
// Category ids arrive as raw strings; the command handler parses them and
// checks they exist before the aggregate sees them.
//
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GenreCreateCommand {
    pub name: String,
    pub categories_id: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreUpdateCommand {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories_id: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl GenreUpdateCommand {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            categories_id: None,
            is_active: None,
        }
    }
}
