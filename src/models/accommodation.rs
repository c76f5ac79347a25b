use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{day_span, DateWindow, EntityId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: EntityId,
    pub destination_id: EntityId,
    pub place_name: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub notes: String,
    pub nights: i64,
    pub created_at: DateTime<Utc>,
}

impl Accommodation {
    pub fn new(
        id: EntityId,
        destination_id: EntityId,
        place_name: String,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        notes: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            destination_id,
            place_name,
            check_in,
            check_out,
            notes,
            nights: day_span(check_in, check_out),
            created_at,
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.check_in, self.check_out)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccommodation {
    pub place_name: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccommodation {
    pub place_name: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}
