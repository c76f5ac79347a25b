use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{day_span, DateWindow, EntityId};

/// A place visited within a trip. Child collections are not stored on the
/// destination; they are looked up by `destination_id` when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: EntityId,
    pub trip_id: EntityId,
    pub location: String,
    pub arrival_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    pub stay_duration: i64,
    pub created_at: DateTime<Utc>,
}

impl Destination {
    pub fn new(
        id: EntityId,
        trip_id: EntityId,
        location: String,
        arrival_date: DateTime<Utc>,
        departure_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            trip_id,
            location,
            arrival_date,
            departure_date,
            stay_duration: day_span(arrival_date, departure_date),
            created_at,
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.arrival_date, self.departure_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestination {
    pub location: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestination {
    pub location: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
}
