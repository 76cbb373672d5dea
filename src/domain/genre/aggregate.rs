use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::events::GenreCreated;
use super::value_objects::GenreId;
use crate::domain::category::CategoryId;
use crate::seedwork::domain::{
    validate_into, AggregateRoot, AggregateState, DefaultValidationProvider, Entity, Rule,
    RuleSet, ValidationProvider,
};

// ============================================================================
// Genre Aggregate
// ============================================================================
//
// `categories_id` is a set keyed by the id's string form, so adding the same
// category twice is a no-op and iteration order is stable.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct GenreCreateProps {
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: String,
    pub categories_id: BTreeMap<String, CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    state: AggregateState<Genre>,
}

impl Genre {
    pub fn rules() -> RuleSet {
        RuleSet::new()
            .rule("name", Rule::Required)
            .rule("name", Rule::NotEmpty)
            .rule("name", Rule::MaxLength(255))
            .rule("categories_id", Rule::NotEmpty)
    }

    pub fn restore(
        genre_id: GenreId,
        name: impl Into<String>,
        categories_id: impl IntoIterator<Item = CategoryId>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            genre_id,
            name: name.into(),
            categories_id: categories_id.into_iter().map(|id| (id.to_string(), id)).collect(),
            is_active,
            created_at,
            state: AggregateState::new(),
        }
    }

    pub fn create(props: GenreCreateProps) -> Self {
        let mut genre = Self::restore(
            GenreId::new(),
            props.name,
            props.categories_id,
            props.is_active.unwrap_or(true),
            Utc::now(),
        );
        genre.validate(None);

        let event = GenreCreated {
            genre_id: genre.genre_id,
            name: genre.name.clone(),
            categories_id: genre.category_ids(),
            is_active: genre.is_active,
            created_at: genre.created_at,
            occurred_on: Utc::now(),
        };
        genre.emit_event(event);
        genre
    }

    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories_id.values().copied().collect()
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"]));
    }

    pub fn add_category_id(&mut self, category_id: CategoryId) {
        self.categories_id.insert(category_id.to_string(), category_id);
    }

    pub fn remove_category_id(&mut self, category_id: &CategoryId) {
        self.categories_id.remove(&category_id.to_string());
        self.validate(Some(&["categories_id"]));
    }

    pub fn sync_categories_id(&mut self, categories_id: impl IntoIterator<Item = CategoryId>) {
        self.categories_id = categories_id.into_iter().map(|id| (id.to_string(), id)).collect();
        self.validate(Some(&["categories_id"]));
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn validate(&mut self, groups: Option<&[&str]>) -> bool {
        self.validate_with(&DefaultValidationProvider, groups)
    }

    pub fn validate_with(&mut self, provider: &dyn ValidationProvider, groups: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(self.state_mut().notification_mut());
        let valid = validate_into(&mut notification, provider, &*self, &Self::rules(), groups);
        *self.state_mut().notification_mut() = notification;
        valid
    }
}

impl Entity for Genre {
    type Id = GenreId;
    const ENTITY_NAME: &'static str = "Genre";

    fn entity_id(&self) -> &GenreId {
        &self.genre_id
    }
}

impl AggregateRoot for Genre {
    fn state(&self) -> &AggregateState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AggregateState<Self> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(name: &str, categories: Vec<CategoryId>) -> GenreCreateProps {
        GenreCreateProps {
            name: name.to_string(),
            categories_id: categories,
            is_active: None,
        }
    }

    #[test]
    fn test_create_deduplicates_categories() {
        let category = CategoryId::new();
        let genre = Genre::create(props("Action", vec![category, category]));

        assert_eq!(genre.categories_id.len(), 1);
        assert!(genre.is_active);
        assert!(!genre.notification().has_errors());
        assert_eq!(genre.events()[0].event_name(), "GenreCreated");
    }

    #[test]
    fn test_create_without_categories_is_invalid() {
        let genre = Genre::create(props("Action", vec![]));
        assert_eq!(
            genre.notification().messages_for("categories_id").unwrap(),
            ["categories_id should not be empty"]
        );
    }

    #[test]
    fn test_add_remove_and_sync_categories() {
        let first = CategoryId::new();
        let second = CategoryId::new();
        let mut genre = Genre::create(props("Action", vec![first]));

        genre.add_category_id(second);
        genre.add_category_id(second);
        assert_eq!(genre.categories_id.len(), 2);

        genre.remove_category_id(&first);
        assert_eq!(genre.category_ids(), vec![second]);
        assert!(!genre.notification().has_errors());

        genre.remove_category_id(&second);
        assert!(genre.notification().has_errors());

        genre.sync_categories_id([first]);
        assert_eq!(genre.category_ids(), vec![first]);
        assert!(!genre.notification().has_errors());
    }

    #[test]
    fn test_change_name_validates_name_group_only() {
        let mut genre = Genre::create(props("Action", vec![CategoryId::new()]));
        genre.change_name("n".repeat(256));

        assert!(genre.notification().messages_for("name").is_some());
        assert!(genre.notification().messages_for("categories_id").is_none());
    }

    #[test]
    fn test_category_sync_keeps_pending_name_error() {
        let mut genre = Genre::create(props("Action", vec![CategoryId::new()]));
        genre.change_name("");
        genre.sync_categories_id([CategoryId::new()]);

        assert_eq!(genre.notification().messages_for("name").unwrap(), ["name should not be empty"]);
        assert!(genre.notification().messages_for("categories_id").is_none());
    }
}
