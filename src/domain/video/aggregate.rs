use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::events::{AudioVideoMediaProcessed, VideoAudioMediaReplaced, VideoCreated};
use super::value_objects::{AudioVideoMedia, AudioVideoMediaStatus, MediaKind, Rating, VideoId};
use crate::domain::category::CategoryId;
use crate::domain::genre::GenreId;
use crate::seedwork::domain::{
    validate_into, AggregateRoot, AggregateState, DefaultValidationProvider, DomainEvent, Entity,
    InvalidArgumentError, Rule, RuleSet, ValidationProvider,
};

// ============================================================================
// Video Aggregate
// ============================================================================
//
// `is_published` is a projection kept by local handlers: it is true iff both
// the trailer and the video exist and finished encoding. Handlers run on
// every event that can change a media slot, inside `emit_event`.
//
// ============================================================================

const MEDIA_EVENTS: [&str; 3] = ["VideoCreated", "VideoAudioMediaReplaced", "AudioVideoMediaProcessed"];

#[derive(Debug, Clone)]
pub struct VideoCreateProps {
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    pub is_opened: bool,
    pub categories_id: Vec<CategoryId>,
    pub genres_id: Vec<GenreId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Video {
    pub video_id: VideoId,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    pub is_opened: bool,
    pub is_published: bool,
    pub categories_id: BTreeMap<String, CategoryId>,
    pub genres_id: BTreeMap<String, GenreId>,
    pub trailer: Option<AudioVideoMedia>,
    pub video: Option<AudioVideoMedia>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    state: AggregateState<Video>,
}

impl Video {
    pub fn rules() -> RuleSet {
        RuleSet::new()
            .rule("title", Rule::Required)
            .rule("title", Rule::NotEmpty)
            .rule("title", Rule::MaxLength(255))
            .rule(
                "year_launched",
                Rule::Range {
                    min: Some(1900),
                    max: Some(2100),
                },
            )
            .rule("duration", Rule::Range { min: Some(1), max: None })
    }

    pub fn restore(
        video_id: VideoId,
        props: VideoCreateProps,
        trailer: Option<AudioVideoMedia>,
        video: Option<AudioVideoMedia>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut restored = Self {
            video_id,
            title: props.title,
            description: props.description,
            year_launched: props.year_launched,
            duration: props.duration,
            rating: props.rating,
            is_opened: props.is_opened,
            is_published: false,
            categories_id: props.categories_id.into_iter().map(|id| (id.to_string(), id)).collect(),
            genres_id: props.genres_id.into_iter().map(|id| (id.to_string(), id)).collect(),
            trailer,
            video,
            created_at,
            state: AggregateState::new(),
        };

        for event_name in MEDIA_EVENTS {
            restored.register_handler(event_name, refresh_is_published);
        }
        restored.is_published = restored.media_completed();
        restored
    }

    pub fn create(props: VideoCreateProps) -> Self {
        let mut video = Self::restore(VideoId::new(), props, None, None, Utc::now());
        video.validate(None);

        let event = VideoCreated {
            video_id: video.video_id,
            title: video.title.clone(),
            year_launched: video.year_launched,
            duration: video.duration,
            rating: video.rating,
            categories_id: video.categories_id.values().copied().collect(),
            genres_id: video.genres_id.values().copied().collect(),
            created_at: video.created_at,
            occurred_on: Utc::now(),
        };
        video.emit_event(event);
        video
    }

    pub fn media(&self, kind: MediaKind) -> Option<&AudioVideoMedia> {
        match kind {
            MediaKind::Trailer => self.trailer.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    fn set_media(&mut self, kind: MediaKind, media: AudioVideoMedia) {
        match kind {
            MediaKind::Trailer => self.trailer = Some(media),
            MediaKind::Video => self.video = Some(media),
        }
    }

    fn media_completed(&self) -> bool {
        let completed = |media: &Option<AudioVideoMedia>| media.as_ref().is_some_and(AudioVideoMedia::is_completed);
        completed(&self.trailer) && completed(&self.video)
    }

    pub fn change_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.validate(Some(&["title"]));
    }

    pub fn change_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn change_year_launched(&mut self, year_launched: i32) {
        self.year_launched = year_launched;
        self.validate(Some(&["year_launched"]));
    }

    pub fn change_duration(&mut self, duration: i32) {
        self.duration = duration;
        self.validate(Some(&["duration"]));
    }

    pub fn change_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }

    pub fn mark_as_opened(&mut self) {
        self.is_opened = true;
    }

    pub fn mark_as_not_opened(&mut self) {
        self.is_opened = false;
    }

    pub fn sync_categories_id(&mut self, categories_id: impl IntoIterator<Item = CategoryId>) {
        self.categories_id = categories_id.into_iter().map(|id| (id.to_string(), id)).collect();
    }

    pub fn sync_genres_id(&mut self, genres_id: impl IntoIterator<Item = GenreId>) {
        self.genres_id = genres_id.into_iter().map(|id| (id.to_string(), id)).collect();
    }

    /// Stores a fresh upload in `kind`'s slot, pending encoding.
    pub fn replace_media(&mut self, kind: MediaKind, media: AudioVideoMedia) {
        self.set_media(kind, media.clone());
        self.emit_event(VideoAudioMediaReplaced {
            video_id: self.video_id,
            kind,
            media,
            occurred_on: Utc::now(),
        });
    }

    /// Applies the encoder's outcome. `Completed` needs the encoded location.
    pub fn process_media(
        &mut self,
        kind: MediaKind,
        status: AudioVideoMediaStatus,
        encoded_location: Option<String>,
    ) -> Result<(), InvalidArgumentError> {
        let current = self
            .media(kind)
            .ok_or_else(|| InvalidArgumentError(format!("Video has no {kind} to process")))?;

        let processed = match (status, encoded_location) {
            (AudioVideoMediaStatus::Completed, Some(location)) => current.complete(location),
            (AudioVideoMediaStatus::Completed, None) => {
                return Err(InvalidArgumentError(
                    "encoded_location is required to complete a media".to_string(),
                ))
            }
            (AudioVideoMediaStatus::Failed, _) => current.fail(),
            (other, _) => {
                return Err(InvalidArgumentError(format!(
                    "Media can only be marked completed or failed, got {other:?}"
                )))
            }
        };

        self.set_media(kind, processed.clone());
        self.emit_event(AudioVideoMediaProcessed {
            video_id: self.video_id,
            kind,
            media: processed,
            occurred_on: Utc::now(),
        });
        Ok(())
    }

    pub fn validate(&mut self, groups: Option<&[&str]>) -> bool {
        self.validate_with(&DefaultValidationProvider, groups)
    }

    pub fn validate_with(&mut self, provider: &dyn ValidationProvider, groups: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(self.state_mut().notification_mut());
        let valid = validate_into(&mut notification, provider, &*self, &Self::rules(), groups);
        *self.state_mut().notification_mut() = notification;
        valid
    }
}

fn refresh_is_published(video: &mut Video, _event: &dyn DomainEvent) {
    video.is_published = video.media_completed();
}

impl Entity for Video {
    type Id = VideoId;
    const ENTITY_NAME: &'static str = "Video";

    fn entity_id(&self) -> &VideoId {
        &self.video_id
    }
}

impl AggregateRoot for Video {
    fn state(&self) -> &AggregateState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AggregateState<Self> {
        &mut self.state
    }
}
