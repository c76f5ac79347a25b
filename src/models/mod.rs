pub mod accommodation;
pub mod activity;
pub mod destination;
pub mod transport;
pub mod trip;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub use accommodation::{Accommodation, CreateAccommodation, UpdateAccommodation};
pub use activity::{Activity, CreateActivity, UpdateActivity};
pub use destination::{CreateDestination, Destination, UpdateDestination};
pub use transport::{CreateTransport, Transport, TransportType, UpdateTransport};
pub use trip::{CreateTrip, Trip, UpdateTrip};

/// Store-assigned row identifier shared by every entity kind.
pub type EntityId = i64;

pub const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Trip,
    Destination,
    Activity,
    Transport,
    Accommodation,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Trip => "Trip",
            EntityKind::Destination => "Destination",
            EntityKind::Activity => "Activity",
            EntityKind::Transport => "Transport",
            EntityKind::Accommodation => "Accommodation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whole days covered by `start..end`, rounded up.
pub fn day_span(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds().abs();
    (ms + DAY_MS - 1) / DAY_MS
}

/// A closed time range `[start, end]` owned by a trip, destination or stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn contains_window(&self, other: &DateWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Calendar dates (UTC) from the start day through the end day.
    pub fn calendar_days(&self) -> Vec<NaiveDate> {
        let last = self.end.date_naive();
        let mut day = self.start.date_naive();
        let mut days = Vec::new();
        while day <= last {
            days.push(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn day_span_rounds_partial_days_up() {
        assert_eq!(day_span(at(2024, 7, 1, 0), at(2024, 7, 5, 0)), 4);
        assert_eq!(day_span(at(2024, 7, 1, 0), at(2024, 7, 1, 1)), 1);
        assert_eq!(day_span(at(2024, 7, 1, 12), at(2024, 7, 3, 13)), 3);
        assert_eq!(day_span(at(2024, 7, 1, 0), at(2024, 7, 1, 0)), 0);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DateWindow::new(at(2024, 7, 1, 0), at(2024, 7, 5, 0));
        assert!(window.contains(at(2024, 7, 1, 0)));
        assert!(window.contains(at(2024, 7, 5, 0)));
        assert!(!window.contains(at(2024, 7, 5, 1)));
        assert!(window.contains_window(&DateWindow::new(at(2024, 7, 1, 0), at(2024, 7, 5, 0))));
        assert!(!window.contains_window(&DateWindow::new(at(2024, 6, 30, 23), at(2024, 7, 2, 0))));
    }

    #[test]
    fn calendar_days_include_both_ends() {
        let window = DateWindow::new(at(2024, 7, 1, 18), at(2024, 7, 3, 9));
        let days: Vec<String> = window
            .calendar_days()
            .into_iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(days, vec!["2024-07-01", "2024-07-02", "2024-07-03"]);
    }
}
