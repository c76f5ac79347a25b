use tracing::{info, warn};

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        Accommodation, Activity, CreateAccommodation, CreateActivity, CreateDestination,
        CreateTransport, CreateTrip, Destination, EntityId, EntityKind, Transport, Trip,
        UpdateAccommodation, UpdateActivity, UpdateDestination, UpdateTransport, UpdateTrip,
    },
    repo::{EntityRepository, Repositories},
    services::itinerary::{self, TripDetail, TripSummary},
    validation::Validate,
};

/// Entry point for every itinerary operation. Each mutation is validated
/// before it reaches a repository; parents are looked up between the
/// field checks and the containment checks so a missing parent is reported
/// as not found rather than as a range error.
#[derive(Clone)]
pub struct PlannerService {
    repos: Repositories,
}

impl PlannerService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            repos: Repositories::new(pool),
        }
    }

    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    pub async fn create_trip(&self, input: &CreateTrip) -> Result<Trip, AppError> {
        let draft = input.validate(&())?;
        let trip = self.repos.trips.create(&draft).await?;
        info!(trip_id = trip.id, "trip created");
        Ok(trip)
    }

    pub async fn list_trips(&self) -> Result<Vec<TripSummary>, AppError> {
        itinerary::list_trips(&self.repos).await
    }

    pub async fn trip_detail(&self, trip_id: EntityId) -> Result<TripDetail, AppError> {
        itinerary::trip_detail(&self.repos, trip_id).await
    }

    pub async fn update_trip(&self, trip_id: EntityId, input: &UpdateTrip) -> Result<Trip, AppError> {
        let current = self.repos.trips.find_by_id(trip_id).await?;
        let destinations = self.repos.destinations.list_by_parent(trip_id).await?;
        let patch = input.validate_update(&current, &destinations)?;
        if !self.repos.trips.update(trip_id, &patch).await? {
            return Err(AppError::NotFound(EntityKind::Trip));
        }
        info!(trip_id, "trip updated");
        self.repos.trips.find_by_id(trip_id).await
    }

    /// Removes the trip with its whole subtree. `false` when it did not exist.
    pub async fn delete_trip(&self, trip_id: EntityId) -> Result<bool, AppError> {
        self.repos.trips.delete_by_id(trip_id).await
    }

    pub async fn add_destination(
        &self,
        trip_id: EntityId,
        input: &CreateDestination,
    ) -> Result<Destination, AppError> {
        let fields = input.normalize()?;
        let trip = self.repos.trips.find_by_id(trip_id).await?;
        let draft = CreateDestination::within(fields, &trip)?;
        let destination = self.repos.destinations.create(&draft).await?;
        info!(trip_id, destination_id = destination.id, "destination added");
        Ok(destination)
    }

    pub async fn find_destination(&self, destination_id: EntityId) -> Result<Destination, AppError> {
        self.repos.destinations.find_by_id(destination_id).await
    }

    pub async fn update_destination(
        &self,
        destination_id: EntityId,
        input: &UpdateDestination,
    ) -> Result<Destination, AppError> {
        let current = self.repos.destinations.find_by_id(destination_id).await?;
        let trip = self.repos.trips.find_by_id(current.trip_id).await?;
        let activities = self.repos.activities.list_by_parent(destination_id).await?;
        let accommodations = self
            .repos
            .accommodations
            .list_by_parent(destination_id)
            .await?;
        let patch = input.validate_update(&current, &trip, &activities, &accommodations)?;
        if !self.repos.destinations.update(destination_id, &patch).await? {
            return Err(AppError::NotFound(EntityKind::Destination));
        }
        info!(destination_id, "destination updated");
        self.repos.destinations.find_by_id(destination_id).await
    }

    pub async fn delete_destination(&self, destination_id: EntityId) -> Result<bool, AppError> {
        self.repos.destinations.delete_by_id(destination_id).await
    }

    pub async fn add_activity(
        &self,
        destination_id: EntityId,
        input: &CreateActivity,
    ) -> Result<Activity, AppError> {
        let fields = input.normalize()?;
        let destination = self.repos.destinations.find_by_id(destination_id).await?;
        let draft = CreateActivity::within(fields, &destination)?;
        let activity = self.repos.activities.create(&draft).await?;
        info!(destination_id, activity_id = activity.id, "activity added");
        Ok(activity)
    }

    pub async fn update_activity(
        &self,
        activity_id: EntityId,
        input: &UpdateActivity,
    ) -> Result<Activity, AppError> {
        let current = self.repos.activities.find_by_id(activity_id).await?;
        let destination = self
            .repos
            .destinations
            .find_by_id(current.destination_id)
            .await?;
        let patch = input.validate_update(&current, &destination)?;
        if !self.repos.activities.update(activity_id, &patch).await? {
            return Err(AppError::NotFound(EntityKind::Activity));
        }
        self.repos.activities.find_by_id(activity_id).await
    }

    pub async fn delete_activity(&self, activity_id: EntityId) -> Result<bool, AppError> {
        self.repos.activities.delete_by_id(activity_id).await
    }

    pub async fn add_transport(
        &self,
        destination_id: EntityId,
        input: &CreateTransport,
    ) -> Result<Transport, AppError> {
        let fields = input.normalize()?;
        let destination = self.repos.destinations.find_by_id(destination_id).await?;
        let draft = CreateTransport::within(fields, &destination)?;
        if draft.outside_stay(&destination) {
            warn!(
                destination_id,
                time = %draft.time,
                "transport scheduled outside the destination stay"
            );
        }
        let transport = self.repos.transport.create(&draft).await?;
        info!(destination_id, transport_id = transport.id, "transport added");
        Ok(transport)
    }

    pub async fn update_transport(
        &self,
        transport_id: EntityId,
        input: &UpdateTransport,
    ) -> Result<Transport, AppError> {
        let current = self.repos.transport.find_by_id(transport_id).await?;
        let patch = input.validate_update(&current)?;
        if !self.repos.transport.update(transport_id, &patch).await? {
            return Err(AppError::NotFound(EntityKind::Transport));
        }
        self.repos.transport.find_by_id(transport_id).await
    }

    pub async fn delete_transport(&self, transport_id: EntityId) -> Result<bool, AppError> {
        self.repos.transport.delete_by_id(transport_id).await
    }

    pub async fn add_accommodation(
        &self,
        destination_id: EntityId,
        input: &CreateAccommodation,
    ) -> Result<Accommodation, AppError> {
        let fields = input.normalize()?;
        let destination = self.repos.destinations.find_by_id(destination_id).await?;
        let draft = CreateAccommodation::within(fields, &destination)?;
        let accommodation = self.repos.accommodations.create(&draft).await?;
        info!(
            destination_id,
            accommodation_id = accommodation.id,
            nights = accommodation.nights,
            "accommodation added"
        );
        Ok(accommodation)
    }

    pub async fn update_accommodation(
        &self,
        accommodation_id: EntityId,
        input: &UpdateAccommodation,
    ) -> Result<Accommodation, AppError> {
        let current = self.repos.accommodations.find_by_id(accommodation_id).await?;
        let destination = self
            .repos
            .destinations
            .find_by_id(current.destination_id)
            .await?;
        let patch = input.validate_update(&current, &destination)?;
        if !self
            .repos
            .accommodations
            .update(accommodation_id, &patch)
            .await?
        {
            return Err(AppError::NotFound(EntityKind::Accommodation));
        }
        self.repos.accommodations.find_by_id(accommodation_id).await
    }

    pub async fn delete_accommodation(&self, accommodation_id: EntityId) -> Result<bool, AppError> {
        self.repos.accommodations.delete_by_id(accommodation_id).await
    }
}
