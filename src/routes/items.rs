//! Update and delete endpoints for the per-destination items. Creation lives
//! under `/destinations/:id/...` since it needs the parent.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    routing::patch,
    Json, Router,
};
use serde_json::json;

use super::{body, ok};
use crate::{
    error::AppError,
    models::{EntityKind, UpdateAccommodation, UpdateActivity, UpdateTransport},
    repo::parse_id,
    state::AppState,
};

pub fn activities_router() -> Router<AppState> {
    Router::new().route("/:id", patch(update_activity).delete(delete_activity))
}

pub fn transport_router() -> Router<AppState> {
    Router::new().route("/:id", patch(update_transport).delete(delete_transport))
}

pub fn accommodations_router() -> Router<AppState> {
    Router::new().route(
        "/:id",
        patch(update_accommodation).delete(delete_accommodation),
    )
}

fn deleted(kind: EntityKind, id: i64) -> impl IntoResponse {
    ok(format!("{kind} deleted successfully"), json!({ "id": id }))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateActivity>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let input = body(payload)?;
    let activity = state.planner.update_activity(id, &input).await?;
    Ok(ok("Activity updated successfully", activity))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.planner.delete_activity(id).await? {
        return Err(AppError::NotFound(EntityKind::Activity));
    }
    Ok(deleted(EntityKind::Activity, id))
}

async fn update_transport(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTransport>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let input = body(payload)?;
    let transport = state.planner.update_transport(id, &input).await?;
    Ok(ok("Transport updated successfully", transport))
}

async fn delete_transport(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.planner.delete_transport(id).await? {
        return Err(AppError::NotFound(EntityKind::Transport));
    }
    Ok(deleted(EntityKind::Transport, id))
}

async fn update_accommodation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccommodation>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let input = body(payload)?;
    let accommodation = state.planner.update_accommodation(id, &input).await?;
    Ok(ok("Accommodation updated successfully", accommodation))
}

async fn delete_accommodation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.planner.delete_accommodation(id).await? {
        return Err(AppError::NotFound(EntityKind::Accommodation));
    }
    Ok(deleted(EntityKind::Accommodation, id))
}
