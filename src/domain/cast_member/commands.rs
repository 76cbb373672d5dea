use serde::Deserialize;

// ============================================================================
// Cast Member Commands
// ============================================================================
//
// The type travels as its numeric code (1 director, 2 actor) and is
// checked by the handler.
//
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CastMemberCreateCommand {
    pub name: String,
    #[serde(rename = "type")]
    pub cast_member_type: i64,
}

impl CastMemberCreateCommand {
    pub fn new(name: impl Into<String>, cast_member_type: i64) -> Self {
        Self {
            name: name.into(),
            cast_member_type,
        }
    }
}

/// Only the fields that are present are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMemberUpdateCommand {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub cast_member_type: Option<i64>,
}

impl CastMemberUpdateCommand {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            cast_member_type: None,
        }
    }
}
