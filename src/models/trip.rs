use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{day_span, DateWindow, EntityId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: EntityId,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Whole days between start and end, rounded up.
    pub duration: i64,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        id: EntityId,
        name: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            start_date,
            end_date,
            duration: day_span(start_date, end_date),
            created_at,
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

/// Raw create-trip request body. Every field is optional so that missing
/// fields can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrip {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrip {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
