use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value_objects::{CastMemberId, CastMemberType};
use crate::seedwork::domain::DomainEvent;

// ============================================================================
// Cast Member Domain Events
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CastMemberCreated {
    pub cast_member_id: CastMemberId,
    pub name: String,
    pub cast_member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}

impl DomainEvent for CastMemberCreated {
    fn event_name(&self) -> &'static str {
        "CastMemberCreated"
    }

    fn aggregate_id(&self) -> String {
        self.cast_member_id.to_string()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
