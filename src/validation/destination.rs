use chrono::{DateTime, Utc};

use super::{
    contained, date, limit, ordered, patch_date, patch_text, Required, Validate, ValidationError,
    ValidationErrorKind, ValidationErrors, LOCATION_MAX,
};
use crate::models::{
    Accommodation, Activity, CreateDestination, DateWindow, Destination, EntityId, Trip,
    UpdateDestination,
};

const DEPARTURE_AFTER_ARRIVAL: &str = "Departure date must be after arrival date";
const WITHIN_TRIP: &str = "Destination dates must be within trip dates";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFields {
    pub(crate) location: String,
    pub(crate) arrival_date: DateTime<Utc>,
    pub(crate) departure_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationDraft {
    pub(crate) trip_id: EntityId,
    pub(crate) location: String,
    pub(crate) arrival_date: DateTime<Utc>,
    pub(crate) departure_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPatch {
    pub(crate) location: String,
    pub(crate) arrival_date: DateTime<Utc>,
    pub(crate) departure_date: DateTime<Utc>,
}

impl Validate for CreateDestination {
    type Parent = Trip;
    type Fields = DestinationFields;
    type Output = DestinationDraft;

    fn normalize(&self) -> Result<DestinationFields, ValidationErrors> {
        let mut required = Required::default();
        let location = required.take("location", "location", self.location.as_deref());
        let arrival = required.take("arrivalDate", "arrival date", self.arrival_date.as_deref());
        let departure = required.take(
            "departureDate",
            "departure date",
            self.departure_date.as_deref(),
        );
        let (Some(location), Some(arrival), Some(departure)) = (location, arrival, departure)
        else {
            return Err(required.into_error());
        };

        let fields = (
            limit("location", location, LOCATION_MAX, "Location"),
            date("arrivalDate", "arrival date", &arrival),
            date("departureDate", "departure date", &departure),
        );
        let (location, arrival_date, departure_date) = match fields {
            (Ok(location), Ok(arrival), Ok(departure)) => (location, arrival, departure),
            (location, arrival, departure) => {
                return Err(ValidationErrors::collect([
                    location.err(),
                    arrival.err(),
                    departure.err(),
                ]))
            }
        };

        ordered(
            ["arrivalDate", "departureDate"],
            arrival_date,
            departure_date,
            DEPARTURE_AFTER_ARRIVAL,
        )?;
        Ok(DestinationFields {
            location,
            arrival_date,
            departure_date,
        })
    }

    fn within(fields: DestinationFields, trip: &Trip) -> Result<DestinationDraft, ValidationErrors> {
        contained(
            vec!["arrivalDate", "departureDate"],
            &trip.window(),
            &DateWindow::new(fields.arrival_date, fields.departure_date),
            WITHIN_TRIP,
        )?;
        Ok(DestinationDraft {
            trip_id: trip.id,
            location: fields.location,
            arrival_date: fields.arrival_date,
            departure_date: fields.departure_date,
        })
    }
}

impl UpdateDestination {
    /// Merges the update into `current`. The new stay must fit the trip and
    /// keep every activity time and accommodation stay inside it.
    pub fn validate_update(
        &self,
        current: &Destination,
        trip: &Trip,
        activities: &[Activity],
        accommodations: &[Accommodation],
    ) -> Result<DestinationPatch, ValidationErrors> {
        let fields = (
            patch_text(
                "location",
                "location",
                self.location.as_deref(),
                &current.location,
                LOCATION_MAX,
                "Location",
            ),
            patch_date(
                "arrivalDate",
                "arrival date",
                self.arrival_date.as_deref(),
                current.arrival_date,
            ),
            patch_date(
                "departureDate",
                "departure date",
                self.departure_date.as_deref(),
                current.departure_date,
            ),
        );
        let (location, arrival_date, departure_date) = match fields {
            (Ok(location), Ok(arrival), Ok(departure)) => (location, arrival, departure),
            (location, arrival, departure) => {
                return Err(ValidationErrors::collect([
                    location.err(),
                    arrival.err(),
                    departure.err(),
                ]))
            }
        };

        ordered(
            ["arrivalDate", "departureDate"],
            arrival_date,
            departure_date,
            DEPARTURE_AFTER_ARRIVAL,
        )?;
        let stay = DateWindow::new(arrival_date, departure_date);
        contained(
            vec!["arrivalDate", "departureDate"],
            &trip.window(),
            &stay,
            WITHIN_TRIP,
        )?;

        let mut stranded = Vec::new();
        if activities.iter().any(|activity| !stay.contains(activity.time)) {
            stranded.push("activities");
        }
        if accommodations
            .iter()
            .any(|stay_at| !stay.contains_window(&stay_at.window()))
        {
            stranded.push("accommodations");
        }
        if !stranded.is_empty() {
            return Err(ValidationErrors::single(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                vec!["arrivalDate", "departureDate"],
                format!(
                    "Destination dates must contain all scheduled {}",
                    stranded.join(" and ")
                ),
            )));
        }

        Ok(DestinationPatch {
            location,
            arrival_date,
            departure_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn europe() -> Trip {
        Trip::new(
            1,
            "Europe".into(),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 14, 0, 0, 0).unwrap(),
            Utc::now(),
        )
    }

    fn paris(arrival: &str, departure: &str) -> CreateDestination {
        CreateDestination {
            location: Some("Paris".into()),
            arrival_date: Some(arrival.into()),
            departure_date: Some(departure.into()),
        }
    }

    #[test]
    fn accepts_stay_touching_trip_bounds() {
        let draft = paris("2024-07-01", "2024-07-14").validate(&europe()).unwrap();
        assert_eq!(draft.trip_id, 1);
        assert_eq!(draft.location, "Paris");
    }

    #[test]
    fn rejects_stay_outside_trip() {
        let err = paris("2024-06-30", "2024-07-05")
            .validate(&europe())
            .unwrap_err();
        assert!(err.has_kind(ValidationErrorKind::OutOfRange));
        assert_eq!(err.to_string(), WITHIN_TRIP);
    }

    #[test]
    fn ordering_is_checked_before_containment() {
        let fields = paris("2024-07-05", "2024-07-01").normalize().unwrap_err();
        assert!(fields.has_kind(ValidationErrorKind::Ordering));
    }

    #[test]
    fn missing_fields_use_one_message() {
        let err = CreateDestination::default().normalize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Location, arrival date, and departure date are required"
        );
    }

    #[test]
    fn update_cannot_strand_an_activity() {
        let trip = europe();
        let current = Destination::new(
            2,
            1,
            "Paris".into(),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 5, 0, 0, 0).unwrap(),
            Utc::now(),
        );
        let museum = Activity {
            id: 9,
            destination_id: 2,
            title: "Museum".into(),
            time: Utc.with_ymd_and_hms(2024, 7, 4, 10, 0, 0).unwrap(),
            notes: String::new(),
            created_at: Utc::now(),
        };
        let update = UpdateDestination {
            departure_date: Some("2024-07-03".into()),
            ..Default::default()
        };
        let err = update
            .validate_update(&current, &trip, &[museum], &[])
            .unwrap_err();
        assert!(err.has_kind(ValidationErrorKind::OutOfRange));
        assert!(err.to_string().contains("activities"));
    }
}
