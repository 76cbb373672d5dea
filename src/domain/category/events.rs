use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value_objects::CategoryId;
use crate::seedwork::domain::DomainEvent;

// ============================================================================
// Category Domain Events
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCreated {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}

impl DomainEvent for CategoryCreated {
    fn event_name(&self) -> &'static str {
        "CategoryCreated"
    }

    fn aggregate_id(&self) -> String {
        self.category_id.to_string()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
