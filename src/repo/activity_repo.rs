use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use super::{from_millis, insert_error, to_millis, EntityRepository};
use crate::{
    db::DbPool,
    error::AppError,
    models::{Activity, EntityId, EntityKind},
    validation::{ActivityDraft, ActivityPatch},
};

const ACTIVITY_SELECT_SQL: &str =
    "SELECT id, destination_id, title, time, notes, created_at FROM activities";

#[derive(FromRow)]
struct ActivityRow {
    id: i64,
    destination_id: i64,
    title: String,
    time: i64,
    notes: String,
    created_at: i64,
}

impl ActivityRow {
    fn into_activity(self) -> Result<Activity, AppError> {
        Ok(Activity {
            id: self.id,
            destination_id: self.destination_id,
            title: self.title,
            time: from_millis("time", self.time)?,
            notes: self.notes,
            created_at: from_millis("created_at", self.created_at)?,
        })
    }
}

#[derive(Clone)]
pub struct SqliteActivities {
    pool: DbPool,
}

impl SqliteActivities {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository for SqliteActivities {
    type Entity = Activity;
    type Draft = ActivityDraft;
    type Patch = ActivityPatch;
    type ParentId = EntityId;

    async fn create(&self, draft: &ActivityDraft) -> Result<Activity, AppError> {
        let id = sqlx::query(
            "INSERT INTO activities (destination_id, title, time, notes) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(draft.destination_id)
        .bind(&draft.title)
        .bind(to_millis(draft.time))
        .bind(&draft.notes)
        .execute(&self.pool)
        .await
        .map_err(|err| insert_error(err, EntityKind::Destination))?
        .last_insert_rowid();
        debug!(destination_id = draft.destination_id, activity_id = id, "activity inserted");
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Activity, AppError> {
        let row: Option<ActivityRow> =
            sqlx::query_as(&format!("{ACTIVITY_SELECT_SQL} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(AppError::NotFound(EntityKind::Activity))?
            .into_activity()
    }

    async fn list_by_parent(&self, destination_id: EntityId) -> Result<Vec<Activity>, AppError> {
        let rows: Vec<ActivityRow> = sqlx::query_as(&format!(
            "{ACTIVITY_SELECT_SQL} WHERE destination_id = ?1 ORDER BY time ASC, id ASC"
        ))
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ActivityRow::into_activity).collect()
    }

    async fn update(&self, id: EntityId, patch: &ActivityPatch) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE activities SET title = ?1, time = ?2, notes = ?3 WHERE id = ?4")
                .bind(&patch.title)
                .bind(to_millis(patch.time))
                .bind(&patch.notes)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
