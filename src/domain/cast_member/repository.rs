use serde::{Deserialize, Serialize};

use super::aggregate::CastMember;
use super::value_objects::CastMemberType;
use crate::seedwork::repository::{InMemorySearch, InMemorySearchableRepository, SearchableRepository, SortValue};
use crate::seedwork::search::SearchFilter;

// ============================================================================
// Cast Member Repository
// ============================================================================

pub const CAST_MEMBER_SORTABLE_FIELDS: &[&str] = &["name", "created_at"];

/// Name substring and/or exact type; both must hold when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMemberFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub cast_member_type: Option<CastMemberType>,
}

impl SearchFilter for CastMemberFilter {
    fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |name| name.trim().is_empty()) && self.cast_member_type.is_none()
    }
}

pub trait CastMemberRepository: SearchableRepository<CastMember, CastMemberFilter> {}

impl<T: SearchableRepository<CastMember, CastMemberFilter>> CastMemberRepository for T {}

pub struct CastMemberSearch;

impl InMemorySearch<CastMember, CastMemberFilter> for CastMemberSearch {
    fn sortable_fields(&self) -> &'static [&'static str] {
        CAST_MEMBER_SORTABLE_FIELDS
    }

    fn matches(&self, member: &CastMember, filter: &CastMemberFilter) -> bool {
        let name_matches = filter
            .name
            .as_deref()
            .map_or(true, |name| member.name.to_lowercase().contains(&name.to_lowercase()));
        let type_matches = filter
            .cast_member_type
            .map_or(true, |cast_member_type| member.cast_member_type == cast_member_type);
        name_matches && type_matches
    }

    fn sort_value(&self, member: &CastMember, field: &str) -> SortValue {
        match field {
            "name" => SortValue::Text(member.name.clone()),
            "created_at" => SortValue::Timestamp(member.created_at),
            _ => SortValue::Null,
        }
    }
}

pub type CastMemberInMemoryRepository = InMemorySearchableRepository<CastMember, CastMemberFilter, CastMemberSearch>;
