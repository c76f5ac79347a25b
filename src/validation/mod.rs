//! Field-level and cross-field checks for every entity kind.
//!
//! Validation is synchronous and never touches storage. Creation payloads go
//! through two steps: [`Validate::normalize`] checks presence, formats and
//! lengths without any parent, then [`Validate::within`] checks the result
//! against the parent record and produces the draft a repository accepts.
//! Drafts and patches cannot be built any other way.

mod destination;
mod items;
mod trip;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::DateWindow;

pub use destination::{DestinationDraft, DestinationFields, DestinationPatch};
pub use items::{
    AccommodationDraft, AccommodationFields, AccommodationPatch, ActivityDraft, ActivityFields,
    ActivityPatch, TransportDraft, TransportFields, TransportPatch,
};
pub use trip::{TripDraft, TripPatch};

pub const TRIP_NAME_MAX: usize = 100;
pub const LOCATION_MAX: usize = 100;
pub const TITLE_MAX: usize = 150;
pub const DETAILS_MAX: usize = 300;
pub const PLACE_NAME_MAX: usize = 150;
pub const NOTES_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationErrorKind {
    Missing,
    MalformedDate,
    TooLong,
    InvalidEnum,
    Ordering,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Request field names (camelCase) the error refers to.
    pub fields: Vec<&'static str>,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        fields: Vec<&'static str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            fields,
            message: message.into(),
        }
    }
}

/// Non-empty list of validation failures for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    fn collect(errors: impl IntoIterator<Item = Option<ValidationError>>) -> Self {
        Self(errors.into_iter().flatten().collect())
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn has_kind(&self, kind: ValidationErrorKind) -> bool {
        self.0.iter().any(|err| err.kind == kind)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Creation-time validation for a raw request payload.
pub trait Validate {
    /// Record the new entity will belong to; `()` for trips.
    type Parent;
    /// Normalized fields that have not been checked against a parent yet.
    type Fields;
    type Output;

    fn normalize(&self) -> Result<Self::Fields, ValidationErrors>;

    fn within(fields: Self::Fields, parent: &Self::Parent) -> Result<Self::Output, ValidationErrors>;

    fn validate(&self, parent: &Self::Parent) -> Result<Self::Output, ValidationErrors> {
        Self::within(self.normalize()?, parent)
    }
}

/// Collects absent required fields so they are reported in one error.
#[derive(Default)]
struct Required {
    missing: Vec<(&'static str, &'static str)>,
}

impl Required {
    fn take(&mut self, field: &'static str, label: &'static str, value: Option<&str>) -> Option<String> {
        let value = trimmed(value);
        if value.is_none() {
            self.missing.push((field, label));
        }
        value
    }

    fn into_error(self) -> ValidationErrors {
        let labels: Vec<&str> = self.missing.iter().map(|(_, label)| *label).collect();
        let fields = self.missing.iter().map(|(field, _)| *field).collect();
        ValidationErrors::single(ValidationError::new(
            ValidationErrorKind::Missing,
            fields,
            required_message(&labels),
        ))
    }
}

fn required_message(labels: &[&str]) -> String {
    let list = match labels {
        [] => return String::new(),
        [one] => (*one).to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    };
    let verb = if labels.len() == 1 { "is" } else { "are" };
    capitalize(&format!("{list} {verb} required"))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn limit(
    field: &'static str,
    value: String,
    max: usize,
    subject: &str,
) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            ValidationErrorKind::TooLong,
            vec![field],
            format!("{subject} cannot exceed {max} characters"),
        ));
    }
    Ok(value)
}

fn notes(value: Option<&str>) -> Result<String, ValidationError> {
    let value = value.map(str::trim).unwrap_or_default().to_string();
    limit("notes", value, NOTES_MAX, "Notes")
}

fn date(field: &'static str, label: &str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_instant(raw).ok_or_else(|| {
        ValidationError::new(
            ValidationErrorKind::MalformedDate,
            vec![field],
            format!("Invalid {label}: '{raw}'"),
        )
    })
}

/// Parses RFC 3339, naive date-times (taken as UTC) and plain dates (UTC
/// midnight). Sub-millisecond digits are dropped, matching what the store
/// keeps.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw.trim()).map(|instant| instant.trunc_subsecs(3))
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn ordered(
    fields: [&'static str; 2],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    message: &str,
) -> Result<(), ValidationErrors> {
    if start < end {
        return Ok(());
    }
    Err(ValidationErrors::single(ValidationError::new(
        ValidationErrorKind::Ordering,
        fields.to_vec(),
        message,
    )))
}

fn contained(
    fields: Vec<&'static str>,
    outer: &DateWindow,
    inner: &DateWindow,
    message: &str,
) -> Result<(), ValidationErrors> {
    if outer.contains_window(inner) {
        return Ok(());
    }
    Err(ValidationErrors::single(ValidationError::new(
        ValidationErrorKind::OutOfRange,
        fields,
        message,
    )))
}

/// Text field of a partial update: absent keeps `current`, present must be
/// non-empty after trimming.
fn patch_text(
    field: &'static str,
    label: &'static str,
    value: Option<&str>,
    current: &str,
    max: usize,
    subject: &str,
) -> Result<String, ValidationError> {
    match value {
        None => Ok(current.to_string()),
        Some(raw) => match trimmed(Some(raw)) {
            Some(value) => limit(field, value, max, subject),
            None => Err(ValidationError::new(
                ValidationErrorKind::Missing,
                vec![field],
                required_message(&[label]),
            )),
        },
    }
}

fn patch_date(
    field: &'static str,
    label: &'static str,
    value: Option<&str>,
    current: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    match value {
        None => Ok(current),
        Some(raw) if raw.trim().is_empty() => Err(ValidationError::new(
            ValidationErrorKind::Missing,
            vec![field],
            required_message(&[label]),
        )),
        Some(raw) => date(field, label, raw),
    }
}

fn patch_notes(value: Option<&str>, current: &str) -> Result<String, ValidationError> {
    match value {
        None => Ok(current.to_string()),
        Some(raw) => notes(Some(raw)),
    }
}
