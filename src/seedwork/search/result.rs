use serde::Serialize;

// ============================================================================
// Search Result - one page of a filtered, sorted collection
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<E> {
    pub items: Vec<E>,
    /// Count of items matching the filter, before pagination
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
}

impl<E> SearchResult<E> {
    pub fn new(items: Vec<E>, total: u64, current_page: u64, per_page: u64) -> Self {
        let last_page = if per_page == 0 { 0 } else { total.div_ceil(per_page) };

        Self {
            items,
            total,
            current_page,
            per_page,
            last_page,
        }
    }

    pub fn map<T>(self, f: impl FnMut(E) -> T) -> SearchResult<T> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}
