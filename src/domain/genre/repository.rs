use serde::{Deserialize, Serialize};

use super::aggregate::Genre;
use crate::domain::category::CategoryId;
use crate::seedwork::repository::{InMemorySearch, InMemorySearchableRepository, SearchableRepository, SortValue};
use crate::seedwork::search::SearchFilter;

// ============================================================================
// Genre Repository
// ============================================================================

pub const GENRE_SORTABLE_FIELDS: &[&str] = &["name", "created_at"];

/// Name substring and/or any-of category ids; both must hold when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories_id: Option<Vec<CategoryId>>,
}

impl GenreFilter {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    pub fn categories_id(&self) -> Option<&[CategoryId]> {
        self.categories_id.as_deref().filter(|ids| !ids.is_empty())
    }
}

impl SearchFilter for GenreFilter {
    fn is_empty(&self) -> bool {
        self.name().is_none() && self.categories_id().is_none()
    }
}

pub trait GenreRepository: SearchableRepository<Genre, GenreFilter> {}

impl<T: SearchableRepository<Genre, GenreFilter>> GenreRepository for T {}

pub struct GenreSearch;

impl InMemorySearch<Genre, GenreFilter> for GenreSearch {
    fn sortable_fields(&self) -> &'static [&'static str] {
        GENRE_SORTABLE_FIELDS
    }

    fn matches(&self, genre: &Genre, filter: &GenreFilter) -> bool {
        let name_matches = filter
            .name()
            .map_or(true, |name| genre.name.to_lowercase().contains(&name.to_lowercase()));
        let categories_match = filter
            .categories_id()
            .map_or(true, |ids| ids.iter().any(|id| genre.categories_id.contains_key(&id.to_string())));

        name_matches && categories_match
    }

    fn sort_value(&self, genre: &Genre, field: &str) -> SortValue {
        match field {
            "name" => SortValue::Text(genre.name.clone()),
            "created_at" => SortValue::Timestamp(genre.created_at),
            _ => SortValue::Null,
        }
    }
}

pub type GenreInMemoryRepository = InMemorySearchableRepository<Genre, GenreFilter, GenreSearch>;
