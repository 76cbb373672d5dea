use std::sync::Arc;

use anyhow::Result;

use super::aggregate::Category;
use super::commands::{CategoryCreateCommand, CategoryUpdateCommand};
use super::repository::{CategoryFilter, CategoryRepository};
use super::value_objects::CategoryId;
use crate::seedwork::application::ApplicationService;
use crate::seedwork::domain::{AggregateRoot, Entity, NotFoundError};
use crate::seedwork::search::{RawSearchParams, SearchParams, SearchResult};

// ============================================================================
// Category Command Handler
// ============================================================================
//
// Orchestrates: Command → Aggregate → Repository, inside the application
// service's unit of work. Reads bypass the unit of work.
//
// ============================================================================

pub struct CategoryCommandHandler {
    app_service: Arc<ApplicationService>,
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryCommandHandler {
    pub fn new(app_service: Arc<ApplicationService>, repository: Arc<dyn CategoryRepository>) -> Self {
        Self { app_service, repository }
    }

    pub async fn create(&self, command: CategoryCreateCommand) -> Result<Category> {
        self.app_service
            .run(|| async move {
                let category = Category::create(command);
                if category.notification().has_errors() {
                    return Err(category.notification().to_error().into());
                }

                self.repository.insert(&category).await?;
                tracing::info!(category_id = %category.category_id, "Category created");
                Ok(category)
            })
            .await
    }

    pub async fn update(&self, command: CategoryUpdateCommand) -> Result<Category> {
        self.app_service
            .run(|| async move {
                let mut category = self.load(&command.id).await?;

                if let Some(name) = command.name {
                    category.change_name(name);
                }
                if command.description.is_some() {
                    category.change_description(command.description);
                }
                match command.is_active {
                    Some(true) => category.activate(),
                    Some(false) => category.deactivate(),
                    None => {}
                }

                if category.notification().has_errors() {
                    return Err(category.notification().to_error().into());
                }

                self.repository.update(&category).await?;
                tracing::info!(category_id = %category.category_id, "Category updated");
                Ok(category)
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let category_id = CategoryId::parse(id)?;

        self.app_service
            .run(|| async move {
                self.repository.delete(&category_id).await?;
                tracing::info!(category_id = %category_id, "Category deleted");
                Ok(())
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Category> {
        self.load(id).await
    }

    pub async fn list(&self, raw: RawSearchParams<CategoryFilter>) -> Result<SearchResult<Category>> {
        let params = SearchParams::new(raw);
        Ok(self.repository.search(&params).await?)
    }

    async fn load(&self, id: &str) -> Result<Category> {
        let category_id = CategoryId::parse(id)?;
        self.repository
            .find_by_id(&category_id)
            .await?
            .ok_or_else(|| NotFoundError::new(Category::ENTITY_NAME, [category_id]).into())
    }
}
