use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use super::{from_millis, to_millis, EntityRepository};
use crate::{
    cascade,
    db::DbPool,
    error::AppError,
    models::{EntityId, EntityKind, Trip},
    validation::{TripDraft, TripPatch},
};

const TRIP_SELECT_SQL: &str = "SELECT id, name, start_date, end_date, created_at FROM trips";

#[derive(FromRow)]
struct TripRow {
    id: i64,
    name: String,
    start_date: i64,
    end_date: i64,
    created_at: i64,
}

impl TripRow {
    fn into_trip(self) -> Result<Trip, AppError> {
        Ok(Trip::new(
            self.id,
            self.name,
            from_millis("start_date", self.start_date)?,
            from_millis("end_date", self.end_date)?,
            from_millis("created_at", self.created_at)?,
        ))
    }
}

#[derive(Clone)]
pub struct SqliteTrips {
    pool: DbPool,
}

impl SqliteTrips {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository for SqliteTrips {
    type Entity = Trip;
    type Draft = TripDraft;
    type Patch = TripPatch;
    type ParentId = ();

    async fn create(&self, draft: &TripDraft) -> Result<Trip, AppError> {
        let id = sqlx::query("INSERT INTO trips (name, start_date, end_date) VALUES (?1, ?2, ?3)")
            .bind(&draft.name)
            .bind(to_millis(draft.start_date))
            .bind(to_millis(draft.end_date))
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        debug!(trip_id = id, "trip inserted");
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Trip, AppError> {
        let row: Option<TripRow> = sqlx::query_as(&format!("{TRIP_SELECT_SQL} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(AppError::NotFound(EntityKind::Trip))?.into_trip()
    }

    /// Most recent trips first.
    async fn list_by_parent(&self, _parent: ()) -> Result<Vec<Trip>, AppError> {
        let rows: Vec<TripRow> =
            sqlx::query_as(&format!("{TRIP_SELECT_SQL} ORDER BY start_date DESC, id ASC"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(TripRow::into_trip).collect()
    }

    async fn update(&self, id: EntityId, patch: &TripPatch) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE trips SET name = ?1, start_date = ?2, end_date = ?3 WHERE id = ?4")
                .bind(&patch.name)
                .bind(to_millis(patch.start_date))
                .bind(to_millis(patch.end_date))
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, AppError> {
        let report = cascade::delete_trip(&self.pool, id).await?;
        Ok(report.removed())
    }
}
