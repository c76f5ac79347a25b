use chrono::{DateTime, Utc};

use super::{
    contained, date, limit, notes, ordered, patch_date, patch_notes, patch_text, Required,
    Validate, ValidationError, ValidationErrorKind, ValidationErrors, DETAILS_MAX,
    PLACE_NAME_MAX, TITLE_MAX,
};
use crate::models::{
    Accommodation, Activity, CreateAccommodation, CreateActivity, CreateTransport, DateWindow,
    Destination, EntityId, Transport, TransportType, UpdateAccommodation, UpdateActivity,
    UpdateTransport,
};

const ACTIVITY_WITHIN_STAY: &str = "Activity time must be within destination stay period";
const CHECK_OUT_AFTER_CHECK_IN: &str = "Check-out date must be after check-in date";
const STAY_WITHIN_DESTINATION: &str =
    "Accommodation dates must be within destination stay period";

fn activity_in_stay(time: DateTime<Utc>, destination: &Destination) -> Result<(), ValidationErrors> {
    contained(
        vec!["time"],
        &destination.window(),
        &DateWindow::new(time, time),
        ACTIVITY_WITHIN_STAY,
    )
}

fn transport_type(raw: &str) -> Result<TransportType, ValidationError> {
    raw.parse().map_err(|_| {
        ValidationError::new(
            ValidationErrorKind::InvalidEnum,
            vec!["type"],
            format!(
                "Invalid transport type. Must be one of: {}",
                TransportType::allowed()
            ),
        )
    })
}

// Activity

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFields {
    pub(crate) title: String,
    pub(crate) time: DateTime<Utc>,
    pub(crate) notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub(crate) destination_id: EntityId,
    pub(crate) title: String,
    pub(crate) time: DateTime<Utc>,
    pub(crate) notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPatch {
    pub(crate) title: String,
    pub(crate) time: DateTime<Utc>,
    pub(crate) notes: String,
}

impl Validate for CreateActivity {
    type Parent = Destination;
    type Fields = ActivityFields;
    type Output = ActivityDraft;

    fn normalize(&self) -> Result<ActivityFields, ValidationErrors> {
        let mut required = Required::default();
        let title = required.take("title", "title", self.title.as_deref());
        let time = required.take("time", "time", self.time.as_deref());
        let (Some(title), Some(time)) = (title, time) else {
            return Err(required.into_error());
        };

        match (
            limit("title", title, TITLE_MAX, "Activity title"),
            date("time", "time", &time),
            notes(self.notes.as_deref()),
        ) {
            (Ok(title), Ok(time), Ok(notes)) => Ok(ActivityFields { title, time, notes }),
            (title, time, notes) => Err(ValidationErrors::collect([
                title.err(),
                time.err(),
                notes.err(),
            ])),
        }
    }

    fn within(
        fields: ActivityFields,
        destination: &Destination,
    ) -> Result<ActivityDraft, ValidationErrors> {
        activity_in_stay(fields.time, destination)?;
        Ok(ActivityDraft {
            destination_id: destination.id,
            title: fields.title,
            time: fields.time,
            notes: fields.notes,
        })
    }
}

impl UpdateActivity {
    pub fn validate_update(
        &self,
        current: &Activity,
        destination: &Destination,
    ) -> Result<ActivityPatch, ValidationErrors> {
        let fields = (
            patch_text(
                "title",
                "title",
                self.title.as_deref(),
                &current.title,
                TITLE_MAX,
                "Activity title",
            ),
            patch_date("time", "time", self.time.as_deref(), current.time),
            patch_notes(self.notes.as_deref(), &current.notes),
        );
        let (title, time, notes) = match fields {
            (Ok(title), Ok(time), Ok(notes)) => (title, time, notes),
            (title, time, notes) => {
                return Err(ValidationErrors::collect([
                    title.err(),
                    time.err(),
                    notes.err(),
                ]))
            }
        };
        activity_in_stay(time, destination)?;
        Ok(ActivityPatch { title, time, notes })
    }
}

// Transport

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFields {
    pub(crate) kind: TransportType,
    pub(crate) details: String,
    pub(crate) time: DateTime<Utc>,
}

/// Transport times are deliberately not checked against the destination
/// stay; see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDraft {
    pub(crate) destination_id: EntityId,
    pub(crate) kind: TransportType,
    pub(crate) details: String,
    pub(crate) time: DateTime<Utc>,
}

impl TransportDraft {
    pub fn outside_stay(&self, destination: &Destination) -> bool {
        !destination.window().contains(self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPatch {
    pub(crate) kind: TransportType,
    pub(crate) details: String,
    pub(crate) time: DateTime<Utc>,
}

impl Validate for CreateTransport {
    type Parent = Destination;
    type Fields = TransportFields;
    type Output = TransportDraft;

    fn normalize(&self) -> Result<TransportFields, ValidationErrors> {
        let mut required = Required::default();
        let kind = required.take("type", "type", self.kind.as_deref());
        let details = required.take("details", "details", self.details.as_deref());
        let time = required.take("time", "time", self.time.as_deref());
        let (Some(kind), Some(details), Some(time)) = (kind, details, time) else {
            return Err(required.into_error());
        };

        match (
            transport_type(&kind),
            limit("details", details, DETAILS_MAX, "Transport details"),
            date("time", "time", &time),
        ) {
            (Ok(kind), Ok(details), Ok(time)) => Ok(TransportFields {
                kind,
                details,
                time,
            }),
            (kind, details, time) => Err(ValidationErrors::collect([
                kind.err(),
                details.err(),
                time.err(),
            ])),
        }
    }

    fn within(
        fields: TransportFields,
        destination: &Destination,
    ) -> Result<TransportDraft, ValidationErrors> {
        Ok(TransportDraft {
            destination_id: destination.id,
            kind: fields.kind,
            details: fields.details,
            time: fields.time,
        })
    }
}

impl UpdateTransport {
    pub fn validate_update(&self, current: &Transport) -> Result<TransportPatch, ValidationErrors> {
        let kind = match self.kind.as_deref() {
            None => Ok(current.kind),
            Some(raw) if raw.trim().is_empty() => Err(ValidationError::new(
                ValidationErrorKind::Missing,
                vec!["type"],
                "Type is required",
            )),
            Some(raw) => transport_type(raw),
        };
        match (
            kind,
            patch_text(
                "details",
                "details",
                self.details.as_deref(),
                &current.details,
                DETAILS_MAX,
                "Transport details",
            ),
            patch_date("time", "time", self.time.as_deref(), current.time),
        ) {
            (Ok(kind), Ok(details), Ok(time)) => Ok(TransportPatch {
                kind,
                details,
                time,
            }),
            (kind, details, time) => Err(ValidationErrors::collect([
                kind.err(),
                details.err(),
                time.err(),
            ])),
        }
    }
}

// Accommodation

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccommodationFields {
    pub(crate) place_name: String,
    pub(crate) check_in: DateTime<Utc>,
    pub(crate) check_out: DateTime<Utc>,
    pub(crate) notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccommodationDraft {
    pub(crate) destination_id: EntityId,
    pub(crate) place_name: String,
    pub(crate) check_in: DateTime<Utc>,
    pub(crate) check_out: DateTime<Utc>,
    pub(crate) notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccommodationPatch {
    pub(crate) place_name: String,
    pub(crate) check_in: DateTime<Utc>,
    pub(crate) check_out: DateTime<Utc>,
    pub(crate) notes: String,
}

impl Validate for CreateAccommodation {
    type Parent = Destination;
    type Fields = AccommodationFields;
    type Output = AccommodationDraft;

    fn normalize(&self) -> Result<AccommodationFields, ValidationErrors> {
        let mut required = Required::default();
        let place_name = required.take("placeName", "place name", self.place_name.as_deref());
        let check_in = required.take("checkIn", "check-in date", self.check_in.as_deref());
        let check_out = required.take("checkOut", "check-out date", self.check_out.as_deref());
        let (Some(place_name), Some(check_in), Some(check_out)) = (place_name, check_in, check_out)
        else {
            return Err(required.into_error());
        };

        let fields = (
            limit("placeName", place_name, PLACE_NAME_MAX, "Place name"),
            date("checkIn", "check-in date", &check_in),
            date("checkOut", "check-out date", &check_out),
            notes(self.notes.as_deref()),
        );
        let (place_name, check_in, check_out, notes) = match fields {
            (Ok(place_name), Ok(check_in), Ok(check_out), Ok(notes)) => {
                (place_name, check_in, check_out, notes)
            }
            (place_name, check_in, check_out, notes) => {
                return Err(ValidationErrors::collect([
                    place_name.err(),
                    check_in.err(),
                    check_out.err(),
                    notes.err(),
                ]))
            }
        };

        ordered(
            ["checkIn", "checkOut"],
            check_in,
            check_out,
            CHECK_OUT_AFTER_CHECK_IN,
        )?;
        Ok(AccommodationFields {
            place_name,
            check_in,
            check_out,
            notes,
        })
    }

    fn within(
        fields: AccommodationFields,
        destination: &Destination,
    ) -> Result<AccommodationDraft, ValidationErrors> {
        contained(
            vec!["checkIn", "checkOut"],
            &destination.window(),
            &DateWindow::new(fields.check_in, fields.check_out),
            STAY_WITHIN_DESTINATION,
        )?;
        Ok(AccommodationDraft {
            destination_id: destination.id,
            place_name: fields.place_name,
            check_in: fields.check_in,
            check_out: fields.check_out,
            notes: fields.notes,
        })
    }
}

impl UpdateAccommodation {
    pub fn validate_update(
        &self,
        current: &Accommodation,
        destination: &Destination,
    ) -> Result<AccommodationPatch, ValidationErrors> {
        let fields = (
            patch_text(
                "placeName",
                "place name",
                self.place_name.as_deref(),
                &current.place_name,
                PLACE_NAME_MAX,
                "Place name",
            ),
            patch_date(
                "checkIn",
                "check-in date",
                self.check_in.as_deref(),
                current.check_in,
            ),
            patch_date(
                "checkOut",
                "check-out date",
                self.check_out.as_deref(),
                current.check_out,
            ),
            patch_notes(self.notes.as_deref(), &current.notes),
        );
        let (place_name, check_in, check_out, notes) = match fields {
            (Ok(place_name), Ok(check_in), Ok(check_out), Ok(notes)) => {
                (place_name, check_in, check_out, notes)
            }
            (place_name, check_in, check_out, notes) => {
                return Err(ValidationErrors::collect([
                    place_name.err(),
                    check_in.err(),
                    check_out.err(),
                    notes.err(),
                ]))
            }
        };

        ordered(
            ["checkIn", "checkOut"],
            check_in,
            check_out,
            CHECK_OUT_AFTER_CHECK_IN,
        )?;
        contained(
            vec!["checkIn", "checkOut"],
            &destination.window(),
            &DateWindow::new(check_in, check_out),
            STAY_WITHIN_DESTINATION,
        )?;
        Ok(AccommodationPatch {
            place_name,
            check_in,
            check_out,
            notes,
        })
    }
}
