use serde::Deserialize;

use super::value_objects::{AudioVideoMediaStatus, MediaKind, Rating};

// ============================================================================
// Video Commands
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct VideoCreateCommand {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    #[serde(default)]
    pub is_opened: bool,
    #[serde(default)]
    pub categories_id: Vec<String>,
    #[serde(default)]
    pub genres_id: Vec<String>,
}

/// A new upload for one media slot; the previous one is discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoReplaceMediaCommand {
    pub video_id: String,
    pub kind: MediaKind,
    pub name: String,
    pub raw_location: String,
}

/// Encoder callback. Only `completed` and `failed` are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoProcessMediaCommand {
    pub video_id: String,
    pub kind: MediaKind,
    pub status: AudioVideoMediaStatus,
    #[serde(default)]
    pub encoded_location: Option<String>,
}
