pub mod params;
pub mod result;

pub use params::{RawSearchParams, SearchFilter, SearchParams, SortDirection, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use result::SearchResult;
