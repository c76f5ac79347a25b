pub mod destinations;
pub mod items;
pub mod trips;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::AppError, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/trips", trips::router())
        .nest("/destinations", destinations::router())
        .nest("/activities", items::activities_router())
        .nest("/transport", items::transport_router())
        .nest("/accommodations", items::accommodations_router());

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Success body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        count: None,
        data,
    })
}

pub fn ok_list<T: Serialize>(message: impl Into<String>, data: Vec<T>) -> Json<ApiResponse<Vec<T>>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        count: Some(data.len()),
        data,
    })
}

pub fn created<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(message, data))
}

/// Unwraps a JSON body, turning malformed input into a 400 envelope.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn health() -> impl IntoResponse {
    ok(
        "Travel Itinerary API is running!",
        json!({
            "timestamp": Utc::now(),
            "database": "SQLite",
        }),
    )
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}
