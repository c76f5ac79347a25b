//! Composite reads over the trip tree.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    error::AppError,
    models::{Accommodation, Activity, Destination, EntityId, Transport, Trip},
    repo::{EntityRepository, Repositories},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: Trip,
    pub destinations: Vec<DestinationDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDetail {
    #[serde(flatten)]
    pub destination: Destination,
    pub activities: Vec<Activity>,
    pub transport: Vec<Transport>,
    pub accommodations: Vec<Accommodation>,
}

/// Trip listing entry with the stops of the trip but none of their items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[serde(flatten)]
    pub trip: Trip,
    pub destinations: Vec<DestinationStop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationStop {
    pub id: EntityId,
    pub location: String,
    pub arrival_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
}

impl From<Destination> for DestinationStop {
    fn from(destination: Destination) -> Self {
        Self {
            id: destination.id,
            location: destination.location,
            arrival_date: destination.arrival_date,
            departure_date: destination.departure_date,
        }
    }
}

pub async fn list_trips(repos: &Repositories) -> Result<Vec<TripSummary>, AppError> {
    let trips = repos.trips.list_by_parent(()).await?;
    let mut summaries = Vec::with_capacity(trips.len());
    for trip in trips {
        let destinations = repos.destinations.list_by_parent(trip.id).await?;
        summaries.push(TripSummary {
            trip,
            destinations: destinations.into_iter().map(DestinationStop::from).collect(),
        });
    }
    Ok(summaries)
}

/// Loads the trip with every destination and item, each collection in its
/// display order.
pub async fn trip_detail(repos: &Repositories, trip_id: EntityId) -> Result<TripDetail, AppError> {
    let trip = repos.trips.find_by_id(trip_id).await?;
    let destinations = repos.destinations.list_by_parent(trip_id).await?;

    let mut details = Vec::with_capacity(destinations.len());
    for destination in destinations {
        let activities = repos.activities.list_by_parent(destination.id).await?;
        let transport = repos.transport.list_by_parent(destination.id).await?;
        let accommodations = repos.accommodations.list_by_parent(destination.id).await?;
        details.push(DestinationDetail {
            destination,
            activities,
            transport,
            accommodations,
        });
    }

    Ok(TripDetail {
        trip,
        destinations: details,
    })
}

/// One scheduled entry of a day plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DayItem {
    Activity {
        location: String,
        #[serde(flatten)]
        activity: Activity,
    },
    Transport {
        location: String,
        #[serde(flatten)]
        transport: Transport,
    },
    Accommodation {
        location: String,
        #[serde(flatten)]
        accommodation: Accommodation,
    },
}

impl DayItem {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            DayItem::Activity { activity, .. } => activity.time,
            DayItem::Transport { transport, .. } => transport.time,
            DayItem::Accommodation { accommodation, .. } => accommodation.check_in,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Destinations where the traveller spends this day.
    pub destinations: Vec<DestinationStop>,
    pub items: Vec<DayItem>,
}

impl TripDetail {
    /// Everything scheduled on `date` (UTC calendar day), ordered by time.
    ///
    /// A destination counts as active from its arrival day up to, but not
    /// including, its departure day. Items are picked by their own date, so a
    /// departure-day train still shows up.
    pub fn day_plan(&self, date: NaiveDate) -> DayPlan {
        let mut destinations = Vec::new();
        let mut items = Vec::new();

        for detail in &self.destinations {
            let dest = &detail.destination;
            if dest.arrival_date.date_naive() <= date && date < dest.departure_date.date_naive() {
                destinations.push(DestinationStop::from(dest.clone()));
            }

            let location = &dest.location;
            items.extend(
                detail
                    .activities
                    .iter()
                    .filter(|activity| activity.time.date_naive() == date)
                    .map(|activity| DayItem::Activity {
                        location: location.clone(),
                        activity: activity.clone(),
                    }),
            );
            items.extend(
                detail
                    .transport
                    .iter()
                    .filter(|transport| transport.time.date_naive() == date)
                    .map(|transport| DayItem::Transport {
                        location: location.clone(),
                        transport: transport.clone(),
                    }),
            );
            items.extend(
                detail
                    .accommodations
                    .iter()
                    .filter(|stay| stay.check_in.date_naive() == date)
                    .map(|stay| DayItem::Accommodation {
                        location: location.clone(),
                        accommodation: stay.clone(),
                    }),
            );
        }

        items.sort_by_key(DayItem::at);
        DayPlan {
            date,
            destinations,
            items,
        }
    }

    /// Sorted calendar days covered by any destination, arrival through
    /// departure.
    pub fn itinerary_dates(&self) -> Vec<NaiveDate> {
        let days: BTreeSet<NaiveDate> = self
            .destinations
            .iter()
            .flat_map(|detail| detail.destination.window().calendar_days())
            .collect();
        days.into_iter().collect()
    }
}
