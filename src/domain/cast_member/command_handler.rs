use std::sync::Arc;

use anyhow::Result;

use super::aggregate::{CastMember, CastMemberCreateProps};
use super::commands::{CastMemberCreateCommand, CastMemberUpdateCommand};
use super::repository::{CastMemberFilter, CastMemberRepository};
use super::value_objects::{CastMemberId, CastMemberType};
use crate::seedwork::application::ApplicationService;
use crate::seedwork::domain::{AggregateRoot, Entity, NotFoundError};
use crate::seedwork::search::{RawSearchParams, SearchParams, SearchResult};

// ============================================================================
// Cast Member Command Handler
// ============================================================================

pub struct CastMemberCommandHandler {
    app_service: Arc<ApplicationService>,
    repository: Arc<dyn CastMemberRepository>,
}

impl CastMemberCommandHandler {
    pub fn new(app_service: Arc<ApplicationService>, repository: Arc<dyn CastMemberRepository>) -> Self {
        Self { app_service, repository }
    }

    pub async fn create(&self, command: CastMemberCreateCommand) -> Result<CastMember> {
        let cast_member_type = CastMemberType::from_code(command.cast_member_type)?;

        self.app_service
            .run(|| async move {
                let member = CastMember::create(CastMemberCreateProps {
                    name: command.name,
                    cast_member_type,
                });
                if member.notification().has_errors() {
                    return Err(member.notification().to_error().into());
                }

                self.repository.insert(&member).await?;
                tracing::info!(
                    cast_member_id = %member.cast_member_id,
                    cast_member_type = %member.cast_member_type,
                    "Cast member created"
                );
                Ok(member)
            })
            .await
    }

    pub async fn update(&self, command: CastMemberUpdateCommand) -> Result<CastMember> {
        let cast_member_type = command.cast_member_type.map(CastMemberType::from_code).transpose()?;

        self.app_service
            .run(|| async move {
                let mut member = self.load(&command.id).await?;

                if let Some(name) = command.name {
                    member.change_name(name);
                }
                if let Some(cast_member_type) = cast_member_type {
                    member.change_type(cast_member_type);
                }

                if member.notification().has_errors() {
                    return Err(member.notification().to_error().into());
                }

                self.repository.update(&member).await?;
                tracing::info!(cast_member_id = %member.cast_member_id, "Cast member updated");
                Ok(member)
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let cast_member_id = CastMemberId::parse(id)?;

        self.app_service
            .run(|| async move {
                self.repository.delete(&cast_member_id).await?;
                tracing::info!(cast_member_id = %cast_member_id, "Cast member deleted");
                Ok(())
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<CastMember> {
        self.load(id).await
    }

    pub async fn list(&self, raw: RawSearchParams<CastMemberFilter>) -> Result<SearchResult<CastMember>> {
        let params = SearchParams::new(raw);
        Ok(self.repository.search(&params).await?)
    }

    async fn load(&self, id: &str) -> Result<CastMember> {
        let cast_member_id = CastMemberId::parse(id)?;
        self.repository
            .find_by_id(&cast_member_id)
            .await?
            .ok_or_else(|| NotFoundError::new(CastMember::ENTITY_NAME, [cast_member_id]).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cast_member::{CastMemberInMemoryRepository, CastMemberSearch};
    use crate::seedwork::domain::{EntityValidationError, InvalidArgumentError};
    use crate::seedwork::eventing::DomainEventMediator;
    use crate::seedwork::persistence::InMemoryUnitOfWork;
    use serde_json::json;

    struct Fixture {
        handler: CastMemberCommandHandler,
        repository: Arc<CastMemberInMemoryRepository>,
    }

    async fn fixture() -> Fixture {
        let uow = Arc::new(InMemoryUnitOfWork::new());
        let repository = Arc::new(CastMemberInMemoryRepository::with_unit_of_work(CastMemberSearch, uow.clone()).await);
        let app_service = Arc::new(ApplicationService::new(uow, Arc::new(DomainEventMediator::new())));

        Fixture {
            handler: CastMemberCommandHandler::new(app_service, repository.clone()),
            repository,
        }
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let f = fixture().await;
        let created = f.handler.create(CastMemberCreateCommand::new("Ana", 2)).await.unwrap();
        assert_eq!(created.cast_member_type, CastMemberType::Actor);

        let mut command = CastMemberUpdateCommand::new(created.cast_member_id.to_string());
        command.cast_member_type = Some(1);
        let updated = f.handler.update(command).await.unwrap();

        assert_eq!(updated.cast_member_type, CastMemberType::Director);
        assert_eq!(f.repository.items().await[0].cast_member_type, CastMemberType::Director);
    }

    #[tokio::test]
    async fn test_unknown_type_code_is_rejected() {
        let f = fixture().await;
        let err = f.handler.create(CastMemberCreateCommand::new("Ana", 7)).await.unwrap_err();

        assert!(err.downcast_ref::<InvalidArgumentError>().is_some());
        assert!(f.repository.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_name_with_type_change_is_rejected() {
        let f = fixture().await;
        let created = f.handler.create(CastMemberCreateCommand::new("Ana", 2)).await.unwrap();

        let mut command = CastMemberUpdateCommand::new(created.cast_member_id.to_string());
        command.name = Some(String::new());
        command.cast_member_type = Some(1);
        let err = f.handler.update(command).await.unwrap_err();

        assert_eq!(err.downcast_ref::<EntityValidationError>().unwrap().errors[0].field, "name");
        let stored = f.handler.get(&created.cast_member_id.to_string()).await.unwrap();
        assert_eq!(stored.name, "Ana");
        assert_eq!(stored.cast_member_type, CastMemberType::Actor);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let f = fixture().await;
        let kept = f.handler.create(CastMemberCreateCommand::new("Ana", 2)).await.unwrap();
        let removed = f.handler.create(CastMemberCreateCommand::new("Bruno", 1)).await.unwrap();

        f.handler.delete(&removed.cast_member_id.to_string()).await.unwrap();
        let err = f.handler.get(&removed.cast_member_id.to_string()).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());

        let raw: RawSearchParams<CastMemberFilter> = serde_json::from_value(json!({"filter": {"type": "actor"}})).unwrap();
        let result = f.handler.list(raw).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].cast_member_id, kept.cast_member_id);
    }
}
