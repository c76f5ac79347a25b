use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use super::{from_millis, insert_error, to_millis, EntityRepository};
use crate::{
    cascade,
    db::DbPool,
    error::AppError,
    models::{Destination, EntityId, EntityKind},
    validation::{DestinationDraft, DestinationPatch},
};

const DESTINATION_SELECT_SQL: &str =
    "SELECT id, trip_id, location, arrival_date, departure_date, created_at FROM destinations";

#[derive(FromRow)]
struct DestinationRow {
    id: i64,
    trip_id: i64,
    location: String,
    arrival_date: i64,
    departure_date: i64,
    created_at: i64,
}

impl DestinationRow {
    fn into_destination(self) -> Result<Destination, AppError> {
        Ok(Destination::new(
            self.id,
            self.trip_id,
            self.location,
            from_millis("arrival_date", self.arrival_date)?,
            from_millis("departure_date", self.departure_date)?,
            from_millis("created_at", self.created_at)?,
        ))
    }
}

#[derive(Clone)]
pub struct SqliteDestinations {
    pool: DbPool,
}

impl SqliteDestinations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository for SqliteDestinations {
    type Entity = Destination;
    type Draft = DestinationDraft;
    type Patch = DestinationPatch;
    type ParentId = EntityId;

    async fn create(&self, draft: &DestinationDraft) -> Result<Destination, AppError> {
        let id = sqlx::query(
            "INSERT INTO destinations (trip_id, location, arrival_date, departure_date)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(draft.trip_id)
        .bind(&draft.location)
        .bind(to_millis(draft.arrival_date))
        .bind(to_millis(draft.departure_date))
        .execute(&self.pool)
        .await
        .map_err(|err| insert_error(err, EntityKind::Trip))?
        .last_insert_rowid();
        debug!(trip_id = draft.trip_id, destination_id = id, "destination inserted");
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Destination, AppError> {
        let row: Option<DestinationRow> =
            sqlx::query_as(&format!("{DESTINATION_SELECT_SQL} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(AppError::NotFound(EntityKind::Destination))?
            .into_destination()
    }

    async fn list_by_parent(&self, trip_id: EntityId) -> Result<Vec<Destination>, AppError> {
        let rows: Vec<DestinationRow> = sqlx::query_as(&format!(
            "{DESTINATION_SELECT_SQL} WHERE trip_id = ?1 ORDER BY arrival_date ASC, id ASC"
        ))
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(DestinationRow::into_destination)
            .collect()
    }

    async fn update(&self, id: EntityId, patch: &DestinationPatch) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE destinations SET location = ?1, arrival_date = ?2, departure_date = ?3
             WHERE id = ?4",
        )
        .bind(&patch.location)
        .bind(to_millis(patch.arrival_date))
        .bind(to_millis(patch.departure_date))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, AppError> {
        let report = cascade::delete_destination(&self.pool, id).await?;
        Ok(report.removed())
    }
}
