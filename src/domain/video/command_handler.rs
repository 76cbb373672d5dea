use std::sync::Arc;

use anyhow::Result;

use super::aggregate::{Video, VideoCreateProps};
use super::commands::{VideoCreateCommand, VideoProcessMediaCommand, VideoReplaceMediaCommand};
use super::repository::{VideoFilter, VideoRepository};
use super::value_objects::{AudioVideoMedia, VideoId};
use crate::domain::category::{Category, CategoryRepository};
use crate::domain::genre::{Genre, GenreRepository};
use crate::seedwork::application::{existing_ids, ApplicationService};
use crate::seedwork::domain::{AggregateRoot, Entity, NotFoundError};
use crate::seedwork::search::{RawSearchParams, SearchParams, SearchResult};

// ============================================================================
// Video Command Handler
// ============================================================================
//
// replace_media emits VideoAudioMediaReplaced; after commit the mediator
// hands its integration event to whatever is registered for
// "VideoAudioMediaUploadedIntegrationEvent" (the broker publisher).
// process_media is the encoder's callback.
//
// ============================================================================

pub struct VideoCommandHandler {
    app_service: Arc<ApplicationService>,
    repository: Arc<dyn VideoRepository>,
    categories: Arc<dyn CategoryRepository>,
    genres: Arc<dyn GenreRepository>,
}

impl VideoCommandHandler {
    pub fn new(
        app_service: Arc<ApplicationService>,
        repository: Arc<dyn VideoRepository>,
        categories: Arc<dyn CategoryRepository>,
        genres: Arc<dyn GenreRepository>,
    ) -> Self {
        Self {
            app_service,
            repository,
            categories,
            genres,
        }
    }

    pub async fn create(&self, command: VideoCreateCommand) -> Result<Video> {
        self.app_service
            .run(|| async move {
                let categories_id = existing_ids::<Category, _>(&*self.categories, &command.categories_id).await?;
                let genres_id = existing_ids::<Genre, _>(&*self.genres, &command.genres_id).await?;

                let video = Video::create(VideoCreateProps {
                    title: command.title,
                    description: command.description,
                    year_launched: command.year_launched,
                    duration: command.duration,
                    rating: command.rating,
                    is_opened: command.is_opened,
                    categories_id,
                    genres_id,
                });
                if video.notification().has_errors() {
                    return Err(video.notification().to_error().into());
                }

                self.repository.insert(&video).await?;
                tracing::info!(video_id = %video.video_id, "Video created");
                Ok(video)
            })
            .await
    }

    pub async fn replace_media(&self, command: VideoReplaceMediaCommand) -> Result<Video> {
        self.app_service
            .run(|| async move {
                let mut video = self.load(&command.video_id).await?;
                video.replace_media(command.kind, AudioVideoMedia::new(command.name, command.raw_location));

                self.repository.update(&video).await?;
                tracing::info!(video_id = %video.video_id, kind = %command.kind, "Video media replaced");
                Ok(video)
            })
            .await
    }

    pub async fn process_media(&self, command: VideoProcessMediaCommand) -> Result<Video> {
        self.app_service
            .run(|| async move {
                let mut video = self.load(&command.video_id).await?;
                video.process_media(command.kind, command.status, command.encoded_location)?;

                self.repository.update(&video).await?;
                tracing::info!(
                    video_id = %video.video_id,
                    kind = %command.kind,
                    status = ?command.status,
                    is_published = video.is_published,
                    "Video media processed"
                );
                Ok(video)
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Video> {
        self.load(id).await
    }

    pub async fn list(&self, raw: RawSearchParams<VideoFilter>) -> Result<SearchResult<Video>> {
        let params = SearchParams::new(raw);
        Ok(self.repository.search(&params).await?)
    }

    async fn load(&self, id: &str) -> Result<Video> {
        let video_id = VideoId::parse(id)?;
        self.repository
            .find_by_id(&video_id)
            .await?
            .ok_or_else(|| NotFoundError::new(Video::ENTITY_NAME, [video_id]).into())
    }
}
