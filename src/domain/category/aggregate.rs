use chrono::{DateTime, Utc};
use serde::Serialize;

use super::commands::CategoryCreateCommand;
use super::events::CategoryCreated;
use super::value_objects::CategoryId;
use crate::seedwork::domain::{
    validate_into, AggregateRoot, AggregateState, DefaultValidationProvider, Entity, Rule,
    RuleSet, ValidationProvider,
};

// ============================================================================
// Category Aggregate
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    state: AggregateState<Category>,
}

impl Category {
    pub fn rules() -> RuleSet {
        RuleSet::new()
            .rule("name", Rule::Required)
            .rule("name", Rule::NotEmpty)
            .rule("name", Rule::MaxLength(255))
    }

    /// Rebuilds a stored category. No validation, no events.
    pub fn restore(
        category_id: CategoryId,
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category_id,
            name: name.into(),
            description,
            is_active,
            created_at,
            state: AggregateState::new(),
        }
    }

    pub fn create(command: CategoryCreateCommand) -> Self {
        let mut category = Self::restore(
            CategoryId::new(),
            command.name,
            command.description,
            command.is_active.unwrap_or(true),
            Utc::now(),
        );
        category.validate(None);

        let event = CategoryCreated {
            category_id: category.category_id,
            name: category.name.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
            created_at: category.created_at,
            occurred_on: Utc::now(),
        };
        category.emit_event(event);

        tracing::debug!(
            category_id = %category.category_id,
            valid = !category.notification().has_errors(),
            "Category created"
        );
        category
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"]));
    }

    pub fn change_description(&mut self, description: Option<String>) {
        self.description = description;
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

impl Entity for Category {
    type Id = CategoryId;
    const ENTITY_NAME: &'static str = "Category";

    fn entity_id(&self) -> &CategoryId {
        &self.category_id
    }
}

impl AggregateRoot for Category {
    fn state(&self) -> &AggregateState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AggregateState<Self> {
        &mut self.state
    }
}
