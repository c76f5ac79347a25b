//! Transactional subtree deletes.
//!
//! Children are removed explicitly, leaves first, inside one transaction.
//! The schema has no `ON DELETE CASCADE`, so a parent row can never be
//! removed while a child still points at it. An uncommitted transaction is
//! rolled back when dropped, which covers every early `?` return below.

use serde::Serialize;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

use crate::{db::DbPool, error::AppError, models::EntityId};

/// Rows removed by one cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub trips: u64,
    pub destinations: u64,
    pub activities: u64,
    pub transport: u64,
    pub accommodations: u64,
}

impl CascadeReport {
    /// Whether the root row of the delete existed.
    pub fn removed(&self) -> bool {
        self.trips > 0 || self.destinations > 0
    }

    pub fn total(&self) -> u64 {
        self.trips + self.destinations + self.activities + self.transport + self.accommodations
    }
}

/// Which destinations a leaf purge applies to.
#[derive(Clone, Copy)]
enum Scope {
    Trip(EntityId),
    Destination(EntityId),
}

impl Scope {
    fn filter(&self) -> &'static str {
        match self {
            Scope::Trip(_) => "destination_id IN (SELECT id FROM destinations WHERE trip_id = ?1)",
            Scope::Destination(_) => "destination_id = ?1",
        }
    }

    fn id(&self) -> EntityId {
        match self {
            Scope::Trip(id) | Scope::Destination(id) => *id,
        }
    }
}

async fn purge_leaves(
    tx: &mut Transaction<'_, Sqlite>,
    scope: Scope,
    report: &mut CascadeReport,
) -> Result<(), sqlx::Error> {
    let leaves = [
        ("activities", &mut report.activities),
        ("transport", &mut report.transport),
        ("accommodations", &mut report.accommodations),
    ];
    for (table, removed) in leaves {
        *removed = sqlx::query(&format!("DELETE FROM {table} WHERE {}", scope.filter()))
            .bind(scope.id())
            .execute(&mut **tx)
            .await?
            .rows_affected();
    }
    Ok(())
}

pub async fn delete_trip(pool: &DbPool, trip_id: EntityId) -> Result<CascadeReport, AppError> {
    let mut tx = pool.begin().await?;
    let mut report = CascadeReport::default();

    purge_leaves(&mut tx, Scope::Trip(trip_id), &mut report).await?;
    report.destinations = sqlx::query("DELETE FROM destinations WHERE trip_id = ?1")
        .bind(trip_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    report.trips = sqlx::query("DELETE FROM trips WHERE id = ?1")
        .bind(trip_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    if report.trips > 0 {
        info!(
            trip_id,
            destinations = report.destinations,
            activities = report.activities,
            transport = report.transport,
            accommodations = report.accommodations,
            "trip deleted"
        );
    } else {
        debug!(trip_id, "trip delete matched no row");
    }
    Ok(report)
}

pub async fn delete_destination(
    pool: &DbPool,
    destination_id: EntityId,
) -> Result<CascadeReport, AppError> {
    let mut tx = pool.begin().await?;
    let mut report = CascadeReport::default();

    purge_leaves(&mut tx, Scope::Destination(destination_id), &mut report).await?;
    report.destinations = sqlx::query("DELETE FROM destinations WHERE id = ?1")
        .bind(destination_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    if report.destinations > 0 {
        info!(
            destination_id,
            activities = report.activities,
            transport = report.transport,
            accommodations = report.accommodations,
            "destination deleted"
        );
    } else {
        debug!(destination_id, "destination delete matched no row");
    }
    Ok(report)
}
