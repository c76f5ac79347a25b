use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::json;

use super::{body, created, ok, ok_list};
use crate::{
    error::AppError,
    models::{CreateDestination, CreateTrip, EntityKind, UpdateTrip},
    repo::parse_id,
    state::AppState,
    validation::{ValidationError, ValidationErrorKind, ValidationErrors},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route(
            "/:id",
            get(trip_detail).patch(update_trip).delete(delete_trip),
        )
        .route("/:id/days", get(itinerary_dates))
        .route("/:id/days/:date", get(day_plan))
        .route("/:id/destinations", post(add_destination))
}

async fn list_trips(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trips = state.planner.list_trips().await?;
    Ok(ok_list("Trips fetched successfully", trips))
}

async fn create_trip(
    State(state): State<AppState>,
    payload: Result<Json<CreateTrip>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = body(payload)?;
    let trip = state.planner.create_trip(&input).await?;
    Ok(created("Trip created successfully", trip))
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.planner.trip_detail(parse_id(&id)?).await?;
    Ok(ok("Trip fetched successfully", detail))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTrip>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let input = body(payload)?;
    let trip = state.planner.update_trip(id, &input).await?;
    Ok(ok("Trip updated successfully", trip))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.planner.delete_trip(id).await? {
        return Err(AppError::NotFound(EntityKind::Trip));
    }
    Ok(ok("Trip deleted successfully", json!({ "id": id })))
}

async fn itinerary_dates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.planner.trip_detail(parse_id(&id)?).await?;
    Ok(ok_list("Itinerary dates fetched successfully", detail.itinerary_dates()))
}

async fn day_plan(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        ValidationErrors::single(ValidationError::new(
            ValidationErrorKind::MalformedDate,
            vec!["date"],
            format!("Invalid date: '{date}'"),
        ))
    })?;
    let detail = state.planner.trip_detail(id).await?;
    Ok(ok("Day plan fetched successfully", detail.day_plan(date)))
}

async fn add_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateDestination>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let trip_id = parse_id(&id)?;
    let input = body(payload)?;
    let destination = state.planner.add_destination(trip_id, &input).await?;
    Ok(created("Destination added successfully", destination))
}
