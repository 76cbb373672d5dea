use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Search Parameters - sanitized query intent
// ============================================================================
//
// Sanitation is total: whatever arrives in `RawSearchParams` ends up as a
// valid `SearchParams`, no errors raised.
//
// ============================================================================

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive; anything unrecognized is descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Domain filters decide for themselves what "empty" means.
pub trait SearchFilter: Clone + Send + Sync + std::fmt::Debug {
    fn is_empty(&self) -> bool;
}

impl SearchFilter for String {
    fn is_empty(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Unvalidated input, typically deserialized from a query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchParams<F> {
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub per_page: Option<Value>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub sort_dir: Option<String>,
    #[serde(default)]
    pub filter: Option<F>,
}

impl<F> Default for RawSearchParams<F> {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams<F> {
    page: u64,
    per_page: u64,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

impl<F: SearchFilter> SearchParams<F> {
    pub fn new(raw: RawSearchParams<F>) -> Self {
        let sort = raw.sort.filter(|sort| !sort.is_empty());
        let sort_dir = sort
            .as_ref()
            .map(|_| raw.sort_dir.as_deref().map(SortDirection::parse).unwrap_or(SortDirection::Desc));

        Self {
            page: positive_integer(raw.page.as_ref()).unwrap_or(DEFAULT_PAGE),
            per_page: positive_integer(raw.per_page.as_ref()).unwrap_or(DEFAULT_PER_PAGE),
            sort,
            sort_dir,
            filter: raw.filter.filter(|filter| !SearchFilter::is_empty(filter)),
        }
    }
}

impl<F> SearchParams<F> {
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Saturates instead of overflowing for huge pages.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

impl<F: SearchFilter> Default for SearchParams<F> {
    fn default() -> Self {
        Self::new(RawSearchParams::default())
    }
}

/// Accepts a finite positive number equal to its own truncation.
fn positive_integer(value: Option<&Value>) -> Option<u64> {
    let number = match value? {
        Value::Number(n) => match n.as_u64() {
            Some(exact) => return (exact > 0).then_some(exact),
            None => n.as_f64()?,
        },
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => match s.trim().parse::<u64>() {
            Ok(exact) => return (exact > 0).then_some(exact),
            Err(_) => s.trim().parse::<f64>().ok()?,
        },
        Value::Bool(b) => u8::from(*b) as f64,
        _ => return None,
    };

    // 2^64 is the first float past u64::MAX
    if !number.is_finite() || number <= 0.0 || number.trunc() != number || number >= u64::MAX as f64 {
        return None;
    }

    Some(number as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_page(page: Value) -> SearchParams<String> {
        SearchParams::new(RawSearchParams { page: Some(page), ..Default::default() })
    }

    fn with_per_page(per_page: Value) -> SearchParams<String> {
        SearchParams::new(RawSearchParams { per_page: Some(per_page), ..Default::default() })
    }

    #[test]
    fn test_defaults() {
        let params = SearchParams::<String>::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 15);
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);
        assert_eq!(params.filter(), None);
    }

    #[test]
    fn test_malformed_page_resets_to_one() {
        for page in [json!(null), json!(""), json!("fake"), json!(0), json!(-1), json!(5.5), json!(false), json!({}), json!([])] {
            assert_eq!(with_page(page.clone()).page(), 1, "page {page}");
        }
    }

    #[test]
    fn test_valid_page_passes_through() {
        assert_eq!(with_page(json!(1)).page(), 1);
        assert_eq!(with_page(json!(2)).page(), 2);
        assert_eq!(with_page(json!("3")).page(), 3);
        assert_eq!(with_page(json!(true)).page(), 1);
        assert_eq!(with_page(json!(4.0)).page(), 4);
    }

    #[test]
    fn test_malformed_per_page_resets_to_fifteen() {
        for per_page in [json!(null), json!(""), json!("fake"), json!(0), json!(-1), json!(5.5), json!(false), json!({})] {
            assert_eq!(with_per_page(per_page.clone()).per_page(), 15, "per_page {per_page}");
        }
        assert_eq!(with_per_page(json!(10)).per_page(), 10);
        assert_eq!(with_per_page(json!(true)).per_page(), 1);
    }

    #[test]
    fn test_empty_sort_is_absent() {
        let params: SearchParams<String> = SearchParams::new(RawSearchParams { sort: Some(String::new()), ..Default::default() });
        assert_eq!(params.sort(), None);

        let params: SearchParams<String> = SearchParams::new(RawSearchParams { sort: Some("field".into()), ..Default::default() });
        assert_eq!(params.sort(), Some("field"));
    }

    #[test]
    fn test_sort_dir_is_absent_without_sort() {
        for dir in [None, Some("asc"), Some("DESC"), Some("fake")] {
            let params: SearchParams<String> = SearchParams::new(RawSearchParams {
                sort_dir: dir.map(str::to_string),
                ..Default::default()
            });
            assert_eq!(params.sort_dir(), None);
        }
    }

    #[test]
    fn test_sort_dir_is_coerced_case_insensitively() {
        let cases = [
            (None, SortDirection::Desc),
            (Some(""), SortDirection::Desc),
            (Some("fake"), SortDirection::Desc),
            (Some("asc"), SortDirection::Asc),
            (Some("ASC"), SortDirection::Asc),
            (Some("desc"), SortDirection::Desc),
            (Some("DESC"), SortDirection::Desc),
        ];

        for (dir, expected) in cases {
            let params: SearchParams<String> = SearchParams::new(RawSearchParams {
                sort: Some("field".into()),
                sort_dir: dir.map(str::to_string),
                ..Default::default()
            });
            assert_eq!(params.sort_dir(), Some(expected), "sort_dir {dir:?}");
        }
    }

    #[test]
    fn test_empty_filter_is_absent() {
        let params: SearchParams<String> = SearchParams::new(RawSearchParams { filter: Some("  ".into()), ..Default::default() });
        assert_eq!(params.filter(), None);

        let params: SearchParams<String> = SearchParams::new(RawSearchParams { filter: Some("test".into()), ..Default::default() });
        assert_eq!(params.filter().map(String::as_str), Some("test"));
    }

    #[test]
    fn test_offset_and_limit() {
        let params: SearchParams<String> = SearchParams::new(RawSearchParams {
            page: Some(json!(3)),
            per_page: Some(json!(2)),
            ..Default::default()
        });
        assert_eq!(params.offset(), 4);
        assert_eq!(params.limit(), 2);
    }

    #[test]
    fn test_large_page_values_pass_through() {
        assert_eq!(with_page(json!(5_000_000_000u64)).page(), 5_000_000_000);
        assert_eq!(with_page(json!("5000000000")).page(), 5_000_000_000);
        assert_eq!(with_per_page(json!(u64::MAX)).per_page(), u64::MAX);

        let params: SearchParams<String> = SearchParams::new(RawSearchParams {
            page: Some(json!(u64::MAX)),
            per_page: Some(json!(u64::MAX)),
            ..Default::default()
        });
        assert_eq!(params.offset(), u64::MAX);
    }
}
