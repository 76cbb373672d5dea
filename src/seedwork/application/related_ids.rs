use std::str::FromStr;

use anyhow::Result;

use crate::seedwork::domain::{AggregateRoot, InvalidIdentifierError, NotFoundError};
use crate::seedwork::repository::Repository;

/// Parses raw ids of a related aggregate and checks every one is stored.
///
/// Duplicates collapse to one id, first-seen order is kept. A malformed id
/// fails with `InvalidIdentifierError`; missing ids fail together in one
/// `NotFoundError`.
pub async fn existing_ids<E, R>(repository: &R, raw: &[String]) -> Result<Vec<E::Id>>
where
    E: AggregateRoot,
    E::Id: FromStr<Err = InvalidIdentifierError>,
    R: Repository<E> + ?Sized,
{
    let ids = raw.iter().map(|id| id.parse::<E::Id>()).collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Ok(ids);
    }

    let result = repository.exists_by_id(&ids).await?;
    if !result.not_exists.is_empty() {
        return Err(NotFoundError::new(E::ENTITY_NAME, result.not_exists).into());
    }

    Ok(result.exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::{Category, CategoryId, CategoryInMemoryRepository, CategorySearch};
    use chrono::Utc;

    async fn repository_with(ids: &[CategoryId]) -> CategoryInMemoryRepository {
        let repository = CategoryInMemoryRepository::new(CategorySearch);
        let categories: Vec<_> = ids
            .iter()
            .map(|id| Category::restore(*id, "Movie", None, true, Utc::now()))
            .collect();
        repository.bulk_insert(&categories).await.unwrap();
        repository
    }

    #[tokio::test]
    async fn test_existing_ids_dedupes() {
        let id = CategoryId::new();
        let repository = repository_with(&[id]).await;

        let ids = existing_ids::<Category, _>(&repository, &[id.to_string(), id.to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![id]);
    }

    #[tokio::test]
    async fn test_existing_ids_reports_every_missing_id() {
        let stored = CategoryId::new();
        let (first, second) = (CategoryId::new(), CategoryId::new());
        let repository = repository_with(&[stored]).await;

        let err = existing_ids::<Category, _>(
            &repository,
            &[first.to_string(), stored.to_string(), second.to_string()],
        )
        .await
        .unwrap_err();

        let not_found = err.downcast_ref::<NotFoundError>().unwrap();
        assert_eq!(not_found.entity, "Category");
        assert_eq!(not_found.ids, vec![first.to_string(), second.to_string()]);
    }

    #[tokio::test]
    async fn test_existing_ids_rejects_malformed_id() {
        let repository = repository_with(&[]).await;
        let err = existing_ids::<Category, _>(&repository, &["fake id".to_string()])
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<InvalidIdentifierError>().is_some());
    }
}
