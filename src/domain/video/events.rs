use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::value_objects::{AudioVideoMedia, MediaKind, Rating, VideoId};
use crate::domain::category::CategoryId;
use crate::domain::genre::GenreId;
use crate::seedwork::domain::{DomainEvent, IntegrationEvent};

// ============================================================================
// Video Domain Events
// ============================================================================
//
// VideoCreated              local projection only
// VideoAudioMediaReplaced   local projection + integration event (encoder)
// AudioVideoMediaProcessed  local projection only
//
// ============================================================================

pub const VIDEO_MEDIA_UPLOADED_EVENT: &str = "VideoAudioMediaUploadedIntegrationEvent";

#[derive(Debug, Clone, Serialize)]
pub struct VideoCreated {
    pub video_id: VideoId,
    pub title: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    pub categories_id: Vec<CategoryId>,
    pub genres_id: Vec<GenreId>,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}

impl DomainEvent for VideoCreated {
    fn event_name(&self) -> &'static str {
        "VideoCreated"
    }

    fn aggregate_id(&self) -> String {
        self.video_id.to_string()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoAudioMediaReplaced {
    pub video_id: VideoId,
    pub kind: MediaKind,
    pub media: AudioVideoMedia,
    pub occurred_on: DateTime<Utc>,
}

impl DomainEvent for VideoAudioMediaReplaced {
    fn event_name(&self) -> &'static str {
        "VideoAudioMediaReplaced"
    }

    fn aggregate_id(&self) -> String {
        self.video_id.to_string()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn integration_event(&self) -> Option<IntegrationEvent> {
        Some(IntegrationEvent::new(
            VIDEO_MEDIA_UPLOADED_EVENT,
            self.occurred_on,
            json!({
                "resource_id": format!("{}.{}", self.video_id, self.kind),
                "file_path": self.media.raw_url(),
            }),
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioVideoMediaProcessed {
    pub video_id: VideoId,
    pub kind: MediaKind,
    pub media: AudioVideoMedia,
    pub occurred_on: DateTime<Utc>,
}

impl DomainEvent for AudioVideoMediaProcessed {
    fn event_name(&self) -> &'static str {
        "AudioVideoMediaProcessed"
    }

    fn aggregate_id(&self) -> String {
        self.video_id.to_string()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_replaced_builds_integration_event() {
        let video_id = VideoId::new();
        let event = VideoAudioMediaReplaced {
            video_id,
            kind: MediaKind::Trailer,
            media: AudioVideoMedia::new("trailer.mp4", "videos/raw"),
            occurred_on: Utc::now(),
        };

        let integration = event.integration_event().unwrap();
        assert_eq!(integration.event_name, "VideoAudioMediaUploadedIntegrationEvent");
        assert_eq!(integration.payload["resource_id"], format!("{video_id}.trailer"));
        assert_eq!(integration.payload["file_path"], "videos/raw/trailer.mp4");
        assert_eq!(integration.routing_key(), format!("{video_id}.trailer"));
    }

    #[test]
    fn test_processed_has_no_integration_event() {
        let event = AudioVideoMediaProcessed {
            video_id: VideoId::new(),
            kind: MediaKind::Video,
            media: AudioVideoMedia::new("movie.mp4", "videos/raw").complete("videos/encoded"),
            occurred_on: Utc::now(),
        };
        assert!(event.integration_event().is_none());
    }
}
