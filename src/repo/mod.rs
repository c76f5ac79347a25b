//! Persistence behind one repository contract per entity kind.
//!
//! Writes only accept drafts and patches produced by `validation`, so nothing
//! reaches the store unchecked. Instants are stored as epoch milliseconds.

mod accommodation_repo;
mod activity_repo;
mod destination_repo;
mod transport_repo;
mod trip_repo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::DbPool,
    error::AppError,
    models::{EntityId, EntityKind},
};

pub use accommodation_repo::SqliteAccommodations;
pub use activity_repo::SqliteActivities;
pub use destination_repo::SqliteDestinations;
pub use transport_repo::SqliteTransport;
pub use trip_repo::SqliteTrips;

#[async_trait]
pub trait EntityRepository: Send + Sync {
    type Entity: Send;
    type Draft: Send + Sync;
    type Patch: Send + Sync;
    /// `()` for trips, the owning row id for everything else.
    type ParentId: Send + Sync + Copy;

    /// Inserts and returns the row as a later `find_by_id` would see it.
    async fn create(&self, draft: &Self::Draft) -> Result<Self::Entity, AppError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Self::Entity, AppError>;

    async fn list_by_parent(&self, parent: Self::ParentId) -> Result<Vec<Self::Entity>, AppError>;

    /// Returns `false` when no row has `id`.
    async fn update(&self, id: EntityId, patch: &Self::Patch) -> Result<bool, AppError>;

    /// Returns `false` when no row has `id`; never fails for a missing row.
    async fn delete_by_id(&self, id: EntityId) -> Result<bool, AppError>;
}

/// Every repository over one store handle.
#[derive(Clone)]
pub struct Repositories {
    pub trips: SqliteTrips,
    pub destinations: SqliteDestinations,
    pub activities: SqliteActivities,
    pub transport: SqliteTransport,
    pub accommodations: SqliteAccommodations,
}

impl Repositories {
    pub fn new(pool: DbPool) -> Self {
        Self {
            trips: SqliteTrips::new(pool.clone()),
            destinations: SqliteDestinations::new(pool.clone()),
            activities: SqliteActivities::new(pool.clone()),
            transport: SqliteTransport::new(pool.clone()),
            accommodations: SqliteAccommodations::new(pool),
        }
    }
}

/// Parses a path segment into a row id.
pub fn parse_id(raw: &str) -> Result<EntityId, AppError> {
    raw.trim()
        .parse::<EntityId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidId(raw.to_string()))
}

fn to_millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::InvalidData(format!("{column} out of range: {millis}")))
}

/// Maps a failed child insert: a dangling foreign key means the parent row is
/// gone.
fn insert_error(err: sqlx::Error, parent: EntityKind) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::ParentNotFound(parent)
        }
        _ => AppError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_malformed_segments() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_id("0"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_id("-3"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_id("64b1f0"), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn millis_round_trip_keeps_precision() {
        let instant = DateTime::from_timestamp_millis(1_719_914_400_123).unwrap();
        assert_eq!(from_millis("time", to_millis(instant)).unwrap(), instant);
    }
}
