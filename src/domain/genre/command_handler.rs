use std::sync::Arc;

use anyhow::Result;

use super::aggregate::{Genre, GenreCreateProps};
use super::commands::{GenreCreateCommand, GenreUpdateCommand};
use super::repository::{GenreFilter, GenreRepository};
use super::value_objects::GenreId;
use crate::domain::category::{Category, CategoryRepository};
use crate::seedwork::application::{existing_ids, ApplicationService};
use crate::seedwork::domain::{AggregateRoot, Entity, NotFoundError};
use crate::seedwork::search::{RawSearchParams, SearchParams, SearchResult};

// ============================================================================
// Genre Command Handler
// ============================================================================
//
// Category ids on a command must all exist before the genre is touched;
// missing ones are reported together in a single NotFoundError.
//
// ============================================================================

pub struct GenreCommandHandler {
    app_service: Arc<ApplicationService>,
    repository: Arc<dyn GenreRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl GenreCommandHandler {
    pub fn new(
        app_service: Arc<ApplicationService>,
        repository: Arc<dyn GenreRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            app_service,
            repository,
            categories,
        }
    }

    pub async fn create(&self, command: GenreCreateCommand) -> Result<Genre> {
        self.app_service
            .run(|| async move {
                let categories_id = existing_ids::<Category, _>(&*self.categories, &command.categories_id).await?;

                let genre = Genre::create(GenreCreateProps {
                    name: command.name,
                    categories_id,
                    is_active: command.is_active,
                });
                if genre.notification().has_errors() {
                    return Err(genre.notification().to_error().into());
                }

                self.repository.insert(&genre).await?;
                tracing::info!(
                    genre_id = %genre.genre_id,
                    categories = genre.categories_id.len(),
                    "Genre created"
                );
                Ok(genre)
            })
            .await
    }

    pub async fn update(&self, command: GenreUpdateCommand) -> Result<Genre> {
        self.app_service
            .run(|| async move {
                let genre_id = GenreId::parse(&command.id)?;
                let mut genre = self
                    .repository
                    .find_by_id(&genre_id)
                    .await?
                    .ok_or_else(|| NotFoundError::new(Genre::ENTITY_NAME, [genre_id]))?;

                if let Some(name) = command.name {
                    genre.change_name(name);
                }
                if let Some(raw) = command.categories_id {
                    let categories_id = existing_ids::<Category, _>(&*self.categories, &raw).await?;
                    genre.sync_categories_id(categories_id);
                }
                match command.is_active {
                    Some(true) => genre.activate(),
                    Some(false) => genre.deactivate(),
                    None => {}
                }

                if genre.notification().has_errors() {
                    return Err(genre.notification().to_error().into());
                }

                self.repository.update(&genre).await?;
                tracing::info!(genre_id = %genre.genre_id, "Genre updated");
                Ok(genre)
            })
            .await
    }

    pub async fn list(&self, raw: RawSearchParams<GenreFilter>) -> Result<SearchResult<Genre>> {
        let params = SearchParams::new(raw);
        Ok(self.repository.search(&params).await?)
    }
}
