use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{body, created, ok};
use crate::{
    error::AppError,
    models::{CreateAccommodation, CreateActivity, CreateTransport, EntityKind, UpdateDestination},
    repo::parse_id,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:id",
            get(find_destination)
                .patch(update_destination)
                .delete(delete_destination),
        )
        .route("/:id/activities", post(add_activity))
        .route("/:id/transport", post(add_transport))
        .route("/:id/accommodations", post(add_accommodation))
}

async fn find_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let destination = state.planner.find_destination(parse_id(&id)?).await?;
    Ok(ok("Destination fetched successfully", destination))
}

async fn update_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDestination>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let input = body(payload)?;
    let destination = state.planner.update_destination(id, &input).await?;
    Ok(ok("Destination updated successfully", destination))
}

async fn delete_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.planner.delete_destination(id).await? {
        return Err(AppError::NotFound(EntityKind::Destination));
    }
    Ok(ok("Destination deleted successfully", json!({ "id": id })))
}

async fn add_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateActivity>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let destination_id = parse_id(&id)?;
    let input = body(payload)?;
    let activity = state.planner.add_activity(destination_id, &input).await?;
    Ok(created("Activity added successfully", activity))
}

async fn add_transport(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateTransport>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let destination_id = parse_id(&id)?;
    let input = body(payload)?;
    let transport = state.planner.add_transport(destination_id, &input).await?;
    Ok(created("Transport added successfully", transport))
}

async fn add_accommodation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateAccommodation>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let destination_id = parse_id(&id)?;
    let input = body(payload)?;
    let accommodation = state
        .planner
        .add_accommodation(destination_id, &input)
        .await?;
    Ok(created("Accommodation added successfully", accommodation))
}
