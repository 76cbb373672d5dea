use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::contract::{ExistsByIdResult, Repository, SearchableRepository};
use super::sort::{SortSpec, SortValue};
use crate::seedwork::domain::{AggregateRoot, NotFoundError, RepositoryError};
use crate::seedwork::persistence::{InMemoryUnitOfWork, TrackedAggregate, TransactionalStore, UnitOfWork};
use crate::seedwork::search::{SearchFilter, SearchParams, SearchResult, SortDirection};

// ============================================================================
// In-Memory Searchable Repository - reference backend
// ============================================================================
//
// A plain filter / stable sort / slice pipeline over a Vec kept in
// insertion order. Aggregate-specific knowledge (which fields can be
// sorted, what the filter means) comes from an `InMemorySearch` strategy.
//
// ============================================================================

pub trait InMemorySearch<E, F>: Send + Sync + 'static {
    fn sortable_fields(&self) -> &'static [&'static str];

    fn default_sort(&self) -> SortSpec {
        SortSpec::new("created_at", SortDirection::Desc)
    }

    fn matches(&self, entity: &E, filter: &F) -> bool;

    fn sort_value(&self, entity: &E, field: &str) -> SortValue;
}

/// Items plus the snapshot taken when a unit of work started.
pub struct InMemoryStore<E> {
    items: RwLock<Vec<E>>,
    snapshot: Mutex<Option<Vec<E>>>,
}

impl<E> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            snapshot: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<E: Clone + Send + Sync + 'static> TransactionalStore for InMemoryStore<E> {
    async fn begin(&self) {
        let items = self.items.read().await.clone();
        *self.snapshot.lock().await = Some(items);
    }

    async fn commit(&self) {
        self.snapshot.lock().await.take();
    }

    async fn rollback(&self) {
        if let Some(items) = self.snapshot.lock().await.take() {
            *self.items.write().await = items;
        }
    }
}

pub struct InMemorySearchableRepository<E, F, S> {
    store: Arc<InMemoryStore<E>>,
    search: S,
    uow: Option<Arc<dyn UnitOfWork>>,
    _filter: PhantomData<fn() -> F>,
}

impl<E, F, S> InMemorySearchableRepository<E, F, S>
where
    E: AggregateRoot + Clone,
    S: InMemorySearch<E, F>,
{
    pub fn new(search: S) -> Self {
        Self {
            store: Arc::new(InMemoryStore::default()),
            search,
            uow: None,
            _filter: PhantomData,
        }
    }

    /// Joins the unit of work: writes roll back with it and persisted
    /// aggregates are tracked for event publication.
    pub async fn with_unit_of_work(search: S, uow: Arc<InMemoryUnitOfWork>) -> Self {
        let mut repository = Self::new(search);
        uow.register_store(repository.store.clone()).await;
        repository.uow = Some(uow);
        repository
    }

    /// Direct view of the stored items, in insertion order.
    pub async fn items(&self) -> Vec<E> {
        self.store.items.read().await.clone()
    }

    async fn track(&self, entity: &E) {
        if let Some(uow) = &self.uow {
            uow.add_aggregate_root(TrackedAggregate::capture(entity)).await;
        }
    }

    fn stored_copy(entity: &E) -> E {
        let mut stored = entity.clone();
        stored.clear_events();
        stored
    }

    fn apply_filter(&self, items: Vec<E>, filter: Option<&F>) -> Vec<E> {
        match filter {
            Some(filter) => items
                .into_iter()
                .filter(|item| self.search.matches(item, filter))
                .collect(),
            None => items,
        }
    }

    fn apply_sort(&self, mut items: Vec<E>, spec: &SortSpec) -> Vec<E> {
        // sort_by is stable: equal keys keep insertion order
        items.sort_by(|a, b| {
            let left = self.search.sort_value(a, &spec.field);
            let right = self.search.sort_value(b, &spec.field);
            spec.apply(left.cmp(&right))
        });
        items
    }

    fn apply_paginate(items: Vec<E>, page: u64, per_page: u64) -> Vec<E> {
        let offset = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
        let per_page = usize::try_from(per_page).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(per_page).collect()
    }
}

#[async_trait]
impl<E, F, S> Repository<E> for InMemorySearchableRepository<E, F, S>
where
    E: AggregateRoot + Clone,
    F: Send + Sync + 'static,
    S: InMemorySearch<E, F>,
{
    async fn insert(&self, entity: &E) -> Result<(), RepositoryError> {
        self.store.items.write().await.push(Self::stored_copy(entity));
        self.track(entity).await;
        Ok(())
    }

    async fn bulk_insert(&self, entities: &[E]) -> Result<(), RepositoryError> {
        self.store
            .items
            .write()
            .await
            .extend(entities.iter().map(Self::stored_copy));

        for entity in entities {
            self.track(entity).await;
        }
        Ok(())
    }

    async fn update(&self, entity: &E) -> Result<(), RepositoryError> {
        {
            let mut items = self.store.items.write().await;
            let position = items
                .iter()
                .position(|item| item.entity_id() == entity.entity_id())
                .ok_or_else(|| NotFoundError::new(E::ENTITY_NAME, [entity.entity_id()]))?;
            items[position] = Self::stored_copy(entity);
        }

        self.track(entity).await;
        Ok(())
    }

    async fn delete(&self, id: &E::Id) -> Result<(), RepositoryError> {
        let removed = {
            let mut items = self.store.items.write().await;
            let position = items
                .iter()
                .position(|item| item.entity_id() == id)
                .ok_or_else(|| NotFoundError::new(E::ENTITY_NAME, [id]))?;
            items.remove(position)
        };

        tracing::debug!(entity = E::ENTITY_NAME, id = %removed.entity_id(), "Entity deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, RepositoryError> {
        let items = self.store.items.read().await;
        Ok(items.iter().find(|item| item.entity_id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        Ok(self.store.items.read().await.clone())
    }

    async fn find_by_ids(&self, ids: &[E::Id]) -> Result<Vec<E>, RepositoryError> {
        let items = self.store.items.read().await;
        Ok(items
            .iter()
            .filter(|item| ids.contains(item.entity_id()))
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, ids: &[E::Id]) -> Result<ExistsByIdResult<E::Id>, RepositoryError> {
        let items = self.store.items.read().await;
        ExistsByIdResult::partition(ids, |id| items.iter().any(|item| item.entity_id() == id))
    }
}

#[async_trait]
impl<E, F, S> SearchableRepository<E, F> for InMemorySearchableRepository<E, F, S>
where
    E: AggregateRoot + Clone,
    F: SearchFilter + 'static,
    S: InMemorySearch<E, F>,
{
    fn sortable_fields(&self) -> &'static [&'static str] {
        self.search.sortable_fields()
    }

    async fn search(&self, params: &SearchParams<F>) -> Result<SearchResult<E>, RepositoryError> {
        let items = self.store.items.read().await.clone();

        let filtered = self.apply_filter(items, params.filter());
        let total = filtered.len() as u64;

        let spec = SortSpec::resolve(
            params.sort(),
            params.sort_dir(),
            self.search.sortable_fields(),
            self.search.default_sort(),
        );
        let sorted = self.apply_sort(filtered, &spec);
        let page = Self::apply_paginate(sorted, params.page(), params.per_page());

        tracing::debug!(
            aggregate = E::ENTITY_NAME,
            total = total,
            returned = page.len(),
            sort = %spec.field,
            "In-memory search"
        );

        Ok(SearchResult::new(page, total, params.page(), params.per_page()))
    }
}
