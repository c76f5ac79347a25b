use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use super::{from_millis, insert_error, to_millis, EntityRepository};
use crate::{
    db::DbPool,
    error::AppError,
    models::{Accommodation, EntityId, EntityKind},
    validation::{AccommodationDraft, AccommodationPatch},
};

const ACCOMMODATION_SELECT_SQL: &str = "SELECT id, destination_id, place_name, check_in, check_out, notes, created_at
     FROM accommodations";

#[derive(FromRow)]
struct AccommodationRow {
    id: i64,
    destination_id: i64,
    place_name: String,
    check_in: i64,
    check_out: i64,
    notes: String,
    created_at: i64,
}

impl AccommodationRow {
    fn into_accommodation(self) -> Result<Accommodation, AppError> {
        Ok(Accommodation::new(
            self.id,
            self.destination_id,
            self.place_name,
            from_millis("check_in", self.check_in)?,
            from_millis("check_out", self.check_out)?,
            self.notes,
            from_millis("created_at", self.created_at)?,
        ))
    }
}

#[derive(Clone)]
pub struct SqliteAccommodations {
    pool: DbPool,
}

impl SqliteAccommodations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository for SqliteAccommodations {
    type Entity = Accommodation;
    type Draft = AccommodationDraft;
    type Patch = AccommodationPatch;
    type ParentId = EntityId;

    async fn create(&self, draft: &AccommodationDraft) -> Result<Accommodation, AppError> {
        let id = sqlx::query(
            "INSERT INTO accommodations (destination_id, place_name, check_in, check_out, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(draft.destination_id)
        .bind(&draft.place_name)
        .bind(to_millis(draft.check_in))
        .bind(to_millis(draft.check_out))
        .bind(&draft.notes)
        .execute(&self.pool)
        .await
        .map_err(|err| insert_error(err, EntityKind::Destination))?
        .last_insert_rowid();
        debug!(
            destination_id = draft.destination_id,
            accommodation_id = id,
            "accommodation inserted"
        );
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Accommodation, AppError> {
        let row: Option<AccommodationRow> =
            sqlx::query_as(&format!("{ACCOMMODATION_SELECT_SQL} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(AppError::NotFound(EntityKind::Accommodation))?
            .into_accommodation()
    }

    async fn list_by_parent(
        &self,
        destination_id: EntityId,
    ) -> Result<Vec<Accommodation>, AppError> {
        let rows: Vec<AccommodationRow> = sqlx::query_as(&format!(
            "{ACCOMMODATION_SELECT_SQL} WHERE destination_id = ?1 ORDER BY check_in ASC, id ASC"
        ))
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(AccommodationRow::into_accommodation)
            .collect()
    }

    async fn update(&self, id: EntityId, patch: &AccommodationPatch) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE accommodations SET place_name = ?1, check_in = ?2, check_out = ?3, notes = ?4
             WHERE id = ?5",
        )
        .bind(&patch.place_name)
        .bind(to_millis(patch.check_in))
        .bind(to_millis(patch.check_out))
        .bind(&patch.notes)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM accommodations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
