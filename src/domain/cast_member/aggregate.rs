use chrono::{DateTime, Utc};
use serde::Serialize;

use super::events::CastMemberCreated;
use super::value_objects::{CastMemberId, CastMemberType};
use crate::seedwork::domain::{
    validate_into, AggregateRoot, AggregateState, DefaultValidationProvider, Entity, Rule, RuleSet,
    ValidationProvider,
};

// ============================================================================
// Cast Member Aggregate
// ============================================================================

#[derive(Debug, Clone)]
pub struct CastMemberCreateProps {
    pub name: String,
    pub cast_member_type: CastMemberType,
}

#[derive(Debug, Clone, Serialize)]
pub struct CastMember {
    pub cast_member_id: CastMemberId,
    pub name: String,
    pub cast_member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    state: AggregateState<CastMember>,
}

impl CastMember {
    pub fn rules() -> RuleSet {
        RuleSet::new()
            .rule("name", Rule::Required)
            .rule("name", Rule::NotEmpty)
            .rule("name", Rule::MaxLength(255))
    }

    pub fn restore(
        cast_member_id: CastMemberId,
        name: impl Into<String>,
        cast_member_type: CastMemberType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            cast_member_id,
            name: name.into(),
            cast_member_type,
            created_at,
            state: AggregateState::new(),
        }
    }

    pub fn create(props: CastMemberCreateProps) -> Self {
        let mut cast_member = Self::restore(CastMemberId::new(), props.name, props.cast_member_type, Utc::now());
        cast_member.validate(None);

        let event = CastMemberCreated {
            cast_member_id: cast_member.cast_member_id,
            name: cast_member.name.clone(),
            cast_member_type: cast_member.cast_member_type,
            created_at: cast_member.created_at,
            occurred_on: Utc::now(),
        };
        cast_member.emit_event(event);
        cast_member
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"]));
    }

    pub fn change_type(&mut self, cast_member_type: CastMemberType) {
        self.cast_member_type = cast_member_type;
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

impl Entity for CastMember {
    type Id = CastMemberId;
    const ENTITY_NAME: &'static str = "CastMember";

    fn entity_id(&self) -> &CastMemberId {
        &self.cast_member_id
    }
}

impl AggregateRoot for CastMember {
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

    fn props(name: &str) -> CastMemberCreateProps {
        CastMemberCreateProps {
            name: name.to_string(),
            cast_member_type: CastMemberType::Actor,
        }
    }

    #[test]
    fn test_create_emits_event() {
        let member = CastMember::create(props("Ana"));

        assert!(!member.notification().has_errors());
        let created = member.events()[0].downcast_ref::<CastMemberCreated>().unwrap();
        assert_eq!(created.cast_member_id, member.cast_member_id);
        assert_eq!(created.cast_member_type, CastMemberType::Actor);
    }

    #[test]
    fn test_name_rules() {
        let member = CastMember::create(props(&"n".repeat(256)));
        assert_eq!(
            member.notification().messages_for("name").unwrap(),
            ["name must be shorter than or equal to 255 characters"]
        );

        let mut member = CastMember::create(props("Ana"));
        member.change_name("");
        member.change_type(CastMemberType::Director);
        assert_eq!(member.notification().messages_for("name").unwrap(), ["name should not be empty"]);
        assert_eq!(member.cast_member_type, CastMemberType::Director);
    }
}
