use chrono::{DateTime, Utc};

use super::{
    date, limit, ordered, patch_date, patch_text, Required, Validate, ValidationError,
    ValidationErrorKind, ValidationErrors, TRIP_NAME_MAX,
};
use crate::models::{CreateTrip, DateWindow, Destination, Trip, UpdateTrip};

const END_AFTER_START: &str = "End date must be after start date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub(crate) name: String,
    pub(crate) start_date: DateTime<Utc>,
    pub(crate) end_date: DateTime<Utc>,
}

/// Merged values for a trip update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPatch {
    pub(crate) name: String,
    pub(crate) start_date: DateTime<Utc>,
    pub(crate) end_date: DateTime<Utc>,
}

impl Validate for CreateTrip {
    type Parent = ();
    type Fields = TripDraft;
    type Output = TripDraft;

    fn normalize(&self) -> Result<TripDraft, ValidationErrors> {
        let mut required = Required::default();
        let name = required.take("name", "name", self.name.as_deref());
        let start = required.take("startDate", "start date", self.start_date.as_deref());
        let end = required.take("endDate", "end date", self.end_date.as_deref());
        let (Some(name), Some(start), Some(end)) = (name, start, end) else {
            return Err(required.into_error());
        };

        let fields = (
            limit("name", name, TRIP_NAME_MAX, "Trip name"),
            date("startDate", "start date", &start),
            date("endDate", "end date", &end),
        );
        let (name, start_date, end_date) = match fields {
            (Ok(name), Ok(start), Ok(end)) => (name, start, end),
            (name, start, end) => {
                return Err(ValidationErrors::collect([
                    name.err(),
                    start.err(),
                    end.err(),
                ]))
            }
        };

        ordered(["startDate", "endDate"], start_date, end_date, END_AFTER_START)?;
        Ok(TripDraft {
            name,
            start_date,
            end_date,
        })
    }

    fn within(fields: TripDraft, _parent: &()) -> Result<TripDraft, ValidationErrors> {
        Ok(fields)
    }
}

impl UpdateTrip {
    /// Merges the update into `current`. The new window must still hold
    /// every existing destination of the trip.
    pub fn validate_update(
        &self,
        current: &Trip,
        destinations: &[Destination],
    ) -> Result<TripPatch, ValidationErrors> {
        let fields = (
            patch_text(
                "name",
                "name",
                self.name.as_deref(),
                &current.name,
                TRIP_NAME_MAX,
                "Trip name",
            ),
            patch_date(
                "startDate",
                "start date",
                self.start_date.as_deref(),
                current.start_date,
            ),
            patch_date(
                "endDate",
                "end date",
                self.end_date.as_deref(),
                current.end_date,
            ),
        );
        let (name, start_date, end_date) = match fields {
            (Ok(name), Ok(start), Ok(end)) => (name, start, end),
            (name, start, end) => {
                return Err(ValidationErrors::collect([
                    name.err(),
                    start.err(),
                    end.err(),
                ]))
            }
        };

        ordered(["startDate", "endDate"], start_date, end_date, END_AFTER_START)?;

        let window = DateWindow::new(start_date, end_date);
        let stranded: Vec<&str> = destinations
            .iter()
            .filter(|dest| !window.contains_window(&dest.window()))
            .map(|dest| dest.location.as_str())
            .collect();
        if !stranded.is_empty() {
            return Err(ValidationErrors::single(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                vec!["startDate", "endDate"],
                format!(
                    "Trip dates must contain all destinations (outside: {})",
                    stranded.join(", ")
                ),
            )));
        }
        Ok(TripPatch {
            name,
            start_date,
            end_date,
        })
    }
}
