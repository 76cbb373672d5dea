use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value_objects::GenreId;
use crate::domain::category::CategoryId;
use crate::seedwork::domain::DomainEvent;

// ============================================================================
// Genre Domain Events
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GenreCreated {
    pub genre_id: GenreId,
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}

impl DomainEvent for GenreCreated {
    fn event_name(&self) -> &'static str {
        "GenreCreated"
    }

    fn aggregate_id(&self) -> String {
        self.genre_id.to_string()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
