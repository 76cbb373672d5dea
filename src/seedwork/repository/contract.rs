use std::collections::HashSet;

use async_trait::async_trait;

use crate::seedwork::domain::{AggregateRoot, InvalidArgumentError, RepositoryError};
use crate::seedwork::search::{SearchFilter, SearchParams, SearchResult};

// ============================================================================
// Repository Contracts
// ============================================================================
//
// Both backends (in-memory and Postgres) implement the same contract. The
// in-memory one is the reference for behaviour; the Postgres one must give
// the same answers for the same data.
//
// `search` is always filter -> sort -> paginate, and `total` is the number
// of items matching the filter before pagination, in every backend.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ExistsByIdResult<Id> {
    pub exists: Vec<Id>,
    pub not_exists: Vec<Id>,
}

impl<Id: Clone + Eq + std::hash::Hash> ExistsByIdResult<Id> {
    /// Splits `ids` by `exists`, dropping duplicates and keeping first-seen order.
    pub fn partition(ids: &[Id], exists: impl Fn(&Id) -> bool) -> Result<Self, RepositoryError> {
        if ids.is_empty() {
            return Err(InvalidArgumentError("ids must be an array with at least one element".to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut result = Self {
            exists: Vec::new(),
            not_exists: Vec::new(),
        };

        for id in ids.iter().filter(|id| seen.insert((*id).clone())) {
            if exists(id) {
                result.exists.push(id.clone());
            } else {
                result.not_exists.push(id.clone());
            }
        }

        Ok(result)
    }
}

#[async_trait]
pub trait Repository<E: AggregateRoot>: Send + Sync {
    async fn insert(&self, entity: &E) -> Result<(), RepositoryError>;

    async fn bulk_insert(&self, entities: &[E]) -> Result<(), RepositoryError>;

    /// Fails with `NotFoundError` when the aggregate does not exist.
    async fn update(&self, entity: &E) -> Result<(), RepositoryError>;

    /// Fails with `NotFoundError` when the aggregate does not exist. Only the
    /// id is known here, so nothing is registered with the unit of work.
    async fn delete(&self, id: &E::Id) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<E>, RepositoryError>;

    /// Missing ids are silently left out.
    async fn find_by_ids(&self, ids: &[E::Id]) -> Result<Vec<E>, RepositoryError>;

    /// Fails with `InvalidArgumentError` on an empty list.
    async fn exists_by_id(&self, ids: &[E::Id]) -> Result<ExistsByIdResult<E::Id>, RepositoryError>;
}

#[async_trait]
pub trait SearchableRepository<E: AggregateRoot, F: SearchFilter>: Repository<E> {
    fn sortable_fields(&self) -> &'static [&'static str];

    async fn search(&self, params: &SearchParams<F>) -> Result<SearchResult<E>, RepositoryError>;
}
