use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::aggregate::Category;
use super::repository::{CategoryFilter, CATEGORY_SORTABLE_FIELDS};
use super::value_objects::CategoryId;
use crate::metrics::Metrics;
use crate::seedwork::domain::{Entity, NotFoundError, RepositoryError};
use crate::seedwork::persistence::{SqlxUnitOfWork, TrackedAggregate, UnitOfWork};
use crate::seedwork::repository::sql::{push_contains, push_page};
use crate::seedwork::repository::{
    Dialect, ExistsByIdResult, Repository, SearchableRepository, SortClauseBuilder, SortSpec,
};
use crate::seedwork::search::{SearchParams, SearchResult, SortDirection};

// ============================================================================
// Category Postgres Repository
// ============================================================================
//
// Single table, so search is two round-trips: COUNT(*) with the filter,
// then the filtered, sorted, paged select.
//
// ============================================================================

const COLUMNS: &str = "c.category_id, c.name, c.description, c.is_active, c.created_at";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::restore(
            CategoryId::from(row.category_id),
            row.name,
            row.description,
            row.is_active,
            row.created_at,
        )
    }
}

pub struct CategoryPostgresRepository {
    uow: Arc<SqlxUnitOfWork>,
    sort: SortClauseBuilder,
    metrics: Option<Arc<Metrics>>,
}

impl CategoryPostgresRepository {
    pub fn new(uow: Arc<SqlxUnitOfWork>) -> Self {
        Self {
            uow,
            sort: sort_clause_builder(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn track(&self, category: &Category) {
        self.uow.add_aggregate_root(TrackedAggregate::capture(category)).await;
    }
}

fn sort_clause_builder() -> SortClauseBuilder {
    SortClauseBuilder::new(Dialect::Postgres)
        .with_alias("c")
        .with_override(Dialect::Postgres, "name", "{column} COLLATE \"C\"")
        .with_override(Dialect::MySql, "name", "BINARY {column}")
        .with_tiebreaker("category_id")
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: Option<&CategoryFilter>) {
    if let Some(name) = filter.and_then(|filter| filter.name.as_deref()) {
        push_contains(builder, "c.name", name);
    }
}

fn ids_to_uuids(ids: &[CategoryId]) -> Vec<Uuid> {
    ids.iter().map(CategoryId::as_uuid).collect()
}

#[async_trait]
impl Repository<Category> for CategoryPostgresRepository {
    async fn insert(&self, category: &Category) -> Result<(), RepositoryError> {
        self.bulk_insert(std::slice::from_ref(category)).await
    }

    async fn bulk_insert(&self, categories: &[Category]) -> Result<(), RepositoryError> {
        if categories.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO categories (category_id, name, description, is_active, created_at) ",
        );
        builder.push_values(categories, |mut row, category| {
            row.push_bind(category.category_id.as_uuid())
                .push_bind(category.name.clone())
                .push_bind(category.description.clone())
                .push_bind(category.is_active)
                .push_bind(category.created_at);
        });

        {
            let mut conn = self.uow.connection().await?;
            builder.build().execute(&mut *conn).await?;
        }

        for category in categories {
            self.track(category).await;
        }
        tracing::debug!(count = categories.len(), "Categories inserted");
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<(), RepositoryError> {
        let result = {
            let mut conn = self.uow.connection().await?;
            sqlx::query(
                "UPDATE categories SET name = $2, description = $3, is_active = $4 WHERE category_id = $1",
            )
            .bind(category.category_id.as_uuid())
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.is_active)
            .execute(&mut *conn)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(NotFoundError::new(Category::ENTITY_NAME, [category.category_id]).into());
        }

        self.track(category).await;
        Ok(())
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), RepositoryError> {
        let result = {
            let mut conn = self.uow.connection().await?;
            sqlx::query("DELETE FROM categories WHERE category_id = $1")
                .bind(id.as_uuid())
                .execute(&mut *conn)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(NotFoundError::new(Category::ENTITY_NAME, [id]).into());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, RepositoryError> {
        let mut conn = self.uow.connection().await?;
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories c WHERE c.category_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut conn = self.uow.connection().await?;
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories c ORDER BY c.created_at ASC, c.category_id ASC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>, RepositoryError> {
        let mut conn = self.uow.connection().await?;
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories c WHERE c.category_id = ANY($1) ORDER BY c.created_at ASC"
        ))
        .bind(ids_to_uuids(ids))
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn exists_by_id(&self, ids: &[CategoryId]) -> Result<ExistsByIdResult<CategoryId>, RepositoryError> {
        if ids.is_empty() {
            return ExistsByIdResult::partition(ids, |_| false);
        }

        let found: HashSet<Uuid> = {
            let mut conn = self.uow.connection().await?;
            sqlx::query_scalar::<_, Uuid>("SELECT category_id FROM categories WHERE category_id = ANY($1)")
                .bind(ids_to_uuids(ids))
                .fetch_all(&mut *conn)
                .await?
                .into_iter()
                .collect()
        };

        ExistsByIdResult::partition(ids, |id| found.contains(&id.as_uuid()))
    }
}

#[async_trait]
impl SearchableRepository<Category, CategoryFilter> for CategoryPostgresRepository {
    fn sortable_fields(&self) -> &'static [&'static str] {
        CATEGORY_SORTABLE_FIELDS
    }

    async fn search(&self, params: &SearchParams<CategoryFilter>) -> Result<SearchResult<Category>, RepositoryError> {
        let started = Instant::now();
        let spec = SortSpec::resolve(
            params.sort(),
            params.sort_dir(),
            CATEGORY_SORTABLE_FIELDS,
            SortSpec::new("created_at", SortDirection::Desc),
        );

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories c WHERE 1=1");
        push_filter(&mut count, params.filter());

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM categories c WHERE 1=1"));
        push_filter(&mut select, params.filter());
        select.push(self.sort.order_by(&spec));
        push_page(&mut select, params);

        let (total, rows) = {
            let mut conn = self.uow.connection().await?;
            let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;
            let rows = select.build_query_as::<CategoryRow>().fetch_all(&mut *conn).await?;
            (total, rows)
        };

        let elapsed = started.elapsed().as_secs_f64();
        if let Some(metrics) = &self.metrics {
            metrics.record_search(Category::ENTITY_NAME, elapsed);
        }
        tracing::debug!(
            total = total,
            returned = rows.len(),
            sort = %spec.field,
            elapsed_secs = elapsed,
            "Category search"
        );

        Ok(SearchResult::new(
            rows.into_iter().map(Category::from).collect(),
            total as u64,
            params.page(),
            params.per_page(),
        ))
    }
}
