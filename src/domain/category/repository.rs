use serde::{Deserialize, Serialize};

use super::aggregate::Category;
use crate::seedwork::repository::{InMemorySearch, InMemorySearchableRepository, SearchableRepository, SortValue};
use crate::seedwork::search::SearchFilter;

// ============================================================================
// Category Repository
// ============================================================================

pub const CATEGORY_SORTABLE_FIELDS: &[&str] = &["name", "created_at"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryFilter {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }
}

impl SearchFilter for CategoryFilter {
    fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |name| name.trim().is_empty())
    }
}

/// Any searchable store of categories, in-memory or Postgres.
pub trait CategoryRepository: SearchableRepository<Category, CategoryFilter> {}

impl<T: SearchableRepository<Category, CategoryFilter>> CategoryRepository for T {}

pub struct CategorySearch;

impl InMemorySearch<Category, CategoryFilter> for CategorySearch {
    fn sortable_fields(&self) -> &'static [&'static str] {
        CATEGORY_SORTABLE_FIELDS
    }

    fn matches(&self, category: &Category, filter: &CategoryFilter) -> bool {
        match &filter.name {
            Some(name) => category.name.to_lowercase().contains(&name.to_lowercase()),
            None => true,
        }
    }

    fn sort_value(&self, category: &Category, field: &str) -> SortValue {
        match field {
            "name" => SortValue::Text(category.name.clone()),
            "created_at" => SortValue::Timestamp(category.created_at),
            _ => SortValue::Null,
        }
    }
}

pub type CategoryInMemoryRepository = InMemorySearchableRepository<Category, CategoryFilter, CategorySearch>;
