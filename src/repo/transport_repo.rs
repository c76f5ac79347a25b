use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use super::{from_millis, insert_error, to_millis, EntityRepository};
use crate::{
    db::DbPool,
    error::AppError,
    models::{EntityId, EntityKind, Transport, TransportType},
    validation::{TransportDraft, TransportPatch},
};

const TRANSPORT_SELECT_SQL: &str =
    "SELECT id, destination_id, type, details, time, created_at FROM transport";

#[derive(FromRow)]
struct TransportRow {
    id: i64,
    destination_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    details: String,
    time: i64,
    created_at: i64,
}

impl TransportRow {
    fn into_transport(self) -> Result<Transport, AppError> {
        let kind: TransportType = self
            .kind
            .parse()
            .map_err(|err| AppError::InvalidData(format!("transport {}: {err}", self.id)))?;
        Ok(Transport {
            id: self.id,
            destination_id: self.destination_id,
            kind,
            details: self.details,
            time: from_millis("time", self.time)?,
            created_at: from_millis("created_at", self.created_at)?,
        })
    }
}

#[derive(Clone)]
pub struct SqliteTransport {
    pool: DbPool,
}

impl SqliteTransport {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository for SqliteTransport {
    type Entity = Transport;
    type Draft = TransportDraft;
    type Patch = TransportPatch;
    type ParentId = EntityId;

    async fn create(&self, draft: &TransportDraft) -> Result<Transport, AppError> {
        let id = sqlx::query(
            "INSERT INTO transport (destination_id, type, details, time) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(draft.destination_id)
        .bind(draft.kind.as_str())
        .bind(&draft.details)
        .bind(to_millis(draft.time))
        .execute(&self.pool)
        .await
        .map_err(|err| insert_error(err, EntityKind::Destination))?
        .last_insert_rowid();
        debug!(destination_id = draft.destination_id, transport_id = id, "transport inserted");
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Transport, AppError> {
        let row: Option<TransportRow> =
            sqlx::query_as(&format!("{TRANSPORT_SELECT_SQL} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(AppError::NotFound(EntityKind::Transport))?
            .into_transport()
    }

    async fn list_by_parent(&self, destination_id: EntityId) -> Result<Vec<Transport>, AppError> {
        let rows: Vec<TransportRow> = sqlx::query_as(&format!(
            "{TRANSPORT_SELECT_SQL} WHERE destination_id = ?1 ORDER BY time ASC, id ASC"
        ))
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TransportRow::into_transport).collect()
    }

    async fn update(&self, id: EntityId, patch: &TransportPatch) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE transport SET type = ?1, details = ?2, time = ?3 WHERE id = ?4")
                .bind(patch.kind.as_str())
                .bind(&patch.details)
                .bind(to_millis(patch.time))
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transport WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
