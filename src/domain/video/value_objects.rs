use std::fmt;

use serde::{Deserialize, Serialize};

use crate::seedwork::domain::{InvalidArgumentError, ValueObject};

crate::identifier!(
    /// Video identifier
    VideoId
);

// ============================================================================
// Rating
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "L")]
    Free,
    #[serde(rename = "10")]
    Age10,
    #[serde(rename = "12")]
    Age12,
    #[serde(rename = "14")]
    Age14,
    #[serde(rename = "16")]
    Age16,
    #[serde(rename = "18")]
    Age18,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Free => "L",
            Rating::Age10 => "10",
            Rating::Age12 => "12",
            Rating::Age14 => "14",
            Rating::Age16 => "16",
            Rating::Age18 => "18",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InvalidArgumentError> {
        match value {
            "L" => Ok(Rating::Free),
            "10" => Ok(Rating::Age10),
            "12" => Ok(Rating::Age12),
            "14" => Ok(Rating::Age14),
            "16" => Ok(Rating::Age16),
            "18" => Ok(Rating::Age18),
            other => Err(InvalidArgumentError(format!(
                "The rating must be one of the following values: L, 10, 12, 14, 16, 18, passed value: {other}"
            ))),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueObject for Rating {}

// ============================================================================
// Audio/Video Media
// ============================================================================
//
// Pending --process()--> Processing --complete(loc)--> Completed
//                                   \--fail()--------> Failed
//
// Every transition returns a new value; the aggregate swaps it in.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Trailer,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Trailer => f.write_str("trailer"),
            MediaKind::Video => f.write_str("video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioVideoMediaStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioVideoMedia {
    pub name: String,
    pub raw_location: String,
    pub encoded_location: Option<String>,
    pub status: AudioVideoMediaStatus,
}

impl AudioVideoMedia {
    pub fn new(name: impl Into<String>, raw_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_location: raw_location.into(),
            encoded_location: None,
            status: AudioVideoMediaStatus::Pending,
        }
    }

    /// Where the uploaded file lives, handed to the encoder.
    pub fn raw_url(&self) -> String {
        format!("{}/{}", self.raw_location.trim_end_matches('/'), self.name)
    }

    pub fn process(&self) -> Self {
        Self {
            status: AudioVideoMediaStatus::Processing,
            ..self.clone()
        }
    }

    pub fn complete(&self, encoded_location: impl Into<String>) -> Self {
        Self {
            encoded_location: Some(encoded_location.into()),
            status: AudioVideoMediaStatus::Completed,
            ..self.clone()
        }
    }

    pub fn fail(&self) -> Self {
        Self {
            status: AudioVideoMediaStatus::Failed,
            ..self.clone()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AudioVideoMediaStatus::Completed
    }
}

impl ValueObject for AudioVideoMedia {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_parse() {
        assert_eq!(Rating::parse("14").unwrap(), Rating::Age14);
        assert_eq!(Rating::parse("L").unwrap().to_string(), "L");
        assert!(Rating::parse("21").is_err());
        assert_eq!(serde_json::to_value(Rating::Age18).unwrap(), serde_json::json!("18"));
    }

    #[test]
    fn test_media_transitions_return_new_values() {
        let media = AudioVideoMedia::new("movie.mp4", "videos/raw/");
        assert_eq!(media.status, AudioVideoMediaStatus::Pending);
        assert_eq!(media.raw_url(), "videos/raw/movie.mp4");

        let processing = media.process();
        assert_eq!(media.status, AudioVideoMediaStatus::Pending);
        assert_eq!(processing.status, AudioVideoMediaStatus::Processing);

        let completed = processing.complete("videos/encoded/movie.m3u8");
        assert!(completed.is_completed());
        assert_eq!(completed.encoded_location.as_deref(), Some("videos/encoded/movie.m3u8"));
        assert!(!processing.fail().is_completed());
    }

    #[test]
    fn test_media_equality_is_structural() {
        assert_eq!(AudioVideoMedia::new("a", "b"), AudioVideoMedia::new("a", "b"));
        assert_ne!(AudioVideoMedia::new("a", "b"), AudioVideoMedia::new("a", "b").process());
    }
}
