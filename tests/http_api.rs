use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use itinerary::{db, routes::create_router, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = db::connect_in_memory().await.expect("in-memory store");
    create_router(AppState::new(pool))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_europe(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/trips",
        Some(json!({
            "name": "Europe Summer",
            "startDate": "2024-07-01",
            "endDate": "2024-07-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().expect("trip id")
}

#[tokio::test]
async fn health_reports_running() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Travel Itinerary API is running!");
}

#[tokio::test]
async fn unknown_route_uses_the_envelope() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
}

#[tokio::test]
async fn create_trip_returns_derived_duration() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({
            "name": "Europe Summer",
            "startDate": "2024-07-01",
            "endDate": "2024-07-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Trip created successfully");
    assert_eq!(body["data"]["duration"], 13);
    assert_eq!(body["data"]["name"], "Europe Summer");
}

#[tokio::test]
async fn missing_fields_are_reported_together() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/trips", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Name, start date, and end date are required"
    );
    assert_eq!(body["error"][0]["kind"], "missing");
}

#[tokio::test]
async fn sub_millisecond_trip_is_a_validation_error() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({
            "name": "Blink",
            "startDate": "2024-07-01T00:00:00.0001Z",
            "endDate": "2024-07-01T00:00:00.0002Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "End date must be after start date");
    assert_eq!(body["error"][0]["kind"], "ordering");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/trips")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_and_unknown_ids() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/trips/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id: 'abc'");

    let (status, body) = send(&app, Method::GET, "/api/trips/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trip not found");

    let (status, _) = send(&app, Method::DELETE, "/api/activities/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn destination_outside_trip_is_rejected() {
    let app = app().await;
    let trip_id = create_europe(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/trips/{trip_id}/destinations"),
        Some(json!({
            "location": "Berlin",
            "arrivalDate": "2024-07-12",
            "departureDate": "2024-07-20"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Destination dates must be within trip dates");
}

#[tokio::test]
async fn full_itinerary_flow() {
    let app = app().await;
    let trip_id = create_europe(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/trips/{trip_id}/destinations"),
        Some(json!({
            "location": "Paris",
            "arrivalDate": "2024-07-01",
            "departureDate": "2024-07-05"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["stayDuration"], 4);
    let paris = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/destinations/{paris}/activities"),
        Some(json!({ "title": "Louvre Museum", "time": "2024-07-03T10:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/destinations/{paris}/transport"),
        Some(json!({ "type": "Train", "details": "Paris to Rome", "time": "2024-07-03T18:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "train");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/destinations/{paris}/accommodations"),
        Some(json!({
            "placeName": "Hotel Le Marais",
            "checkIn": "2024-07-01",
            "checkOut": "2024-07-05"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["nights"], 4);

    let (status, body) = send(&app, Method::GET, &format!("/api/trips/{trip_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let destinations = body["data"]["destinations"].as_array().unwrap();
    assert_eq!(destinations.len(), 1);
    assert_eq!(destinations[0]["activities"][0]["title"], "Louvre Museum");
    assert_eq!(destinations[0]["transport"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/trips/{trip_id}/days/2024-07-03"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["kind"], "activity");
    assert_eq!(items[1]["kind"], "transport");

    let (status, body) = send(&app, Method::GET, "/api/trips", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/trips/{trip_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/destinations/{paris}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/trips/{trip_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_day_is_rejected() {
    let app = app().await;
    let trip_id = create_europe(&app).await;
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/trips/{trip_id}/days/July-3"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date: 'July-3'");
}
