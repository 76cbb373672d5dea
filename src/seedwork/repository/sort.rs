use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::seedwork::search::SortDirection;

// ============================================================================
// Sorting - shared by the in-memory and SQL backends
// ============================================================================

/// Comparable projection of one sortable field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Requested field if allow-listed, otherwise the default.
    pub fn resolve(
        sort: Option<&str>,
        sort_dir: Option<SortDirection>,
        sortable_fields: &[&str],
        default: SortSpec,
    ) -> SortSpec {
        match sort {
            Some(field) if sortable_fields.contains(&field) => {
                SortSpec::new(field, sort_dir.unwrap_or(SortDirection::Desc))
            }
            _ => default,
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

// ============================================================================
// ORDER BY builder with per-dialect overrides
// ============================================================================
//
// Plain form is `<alias>.<field> <DIR>`. An override replaces the column
// expression for one field on one dialect; `{column}` in the template is
// the qualified column. Case-sensitive text ordering needs one: Postgres
// uses `COLLATE "C"`, MySQL `BINARY`.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
}

#[derive(Debug, Clone)]
pub struct SortClauseBuilder {
    dialect: Dialect,
    table_alias: Option<&'static str>,
    overrides: HashMap<(Dialect, &'static str), &'static str>,
    tiebreaker: Option<&'static str>,
}

impl SortClauseBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table_alias: None,
            overrides: HashMap::new(),
            tiebreaker: None,
        }
    }

    pub fn with_alias(mut self, alias: &'static str) -> Self {
        self.table_alias = Some(alias);
        self
    }

    pub fn with_override(mut self, dialect: Dialect, field: &'static str, template: &'static str) -> Self {
        self.overrides.insert((dialect, field), template);
        self
    }

    /// Extra key appended so equal sort values still page deterministically
    pub fn with_tiebreaker(mut self, column: &'static str) -> Self {
        self.tiebreaker = Some(column);
        self
    }

    pub fn column(&self, field: &str) -> String {
        match self.table_alias {
            Some(alias) => format!("{alias}.{field}"),
            None => field.to_string(),
        }
    }

    /// Column expression without direction, used for SELECT DISTINCT lists.
    pub fn expression(&self, field: &str) -> String {
        let column = self.column(field);
        match self.overrides.get(&(self.dialect, field)) {
            Some(template) => template.replace("{column}", &column),
            None => column,
        }
    }

    /// `spec.field` must already be allow-listed; it is interpolated as-is.
    pub fn order_by(&self, spec: &SortSpec) -> String {
        let mut clause = format!(" ORDER BY {} {}", self.expression(&spec.field), spec.direction.as_sql());

        if let Some(tiebreaker) = self.tiebreaker {
            if tiebreaker != spec.field {
                clause.push_str(&format!(", {} ASC", self.column(tiebreaker)));
            }
        }

        clause
    }
}
