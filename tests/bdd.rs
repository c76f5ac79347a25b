use std::{collections::HashMap, fmt};

use anyhow::Context;
use cucumber::{given, then, when, World as _};
use itinerary::{
    db,
    error::AppError,
    models::{
        Accommodation, CreateAccommodation, CreateActivity, CreateDestination, CreateTrip,
        Destination, Trip,
    },
    repo::EntityRepository,
    services::PlannerService,
};
use tempfile::TempDir;

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    trip: Option<Trip>,
    destinations: HashMap<String, Destination>,
    accommodations: HashMap<String, Accommodation>,
    last_error: Option<AppError>,
}

impl AppWorld {
    fn planner(&self) -> &PlannerService {
        &self
            .state
            .as_ref()
            .expect("state must be initialised first")
            .planner
    }

    fn trip(&self) -> &Trip {
        self.trip.as_ref().expect("a trip must exist first")
    }

    fn destination(&self, location: &str) -> &Destination {
        self.destinations
            .get(location)
            .unwrap_or_else(|| panic!("unknown destination {location}"))
    }
}

struct TestState {
    planner: PlannerService,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db_path = root.path().join("bdd.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let pool = db::connect(&database_url, 2).await?;
        Ok(Self {
            planner: PlannerService::new(pool),
            _root: root,
        })
    }
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.trip = None;
    world.destinations.clear();
    world.accommodations.clear();
    world.last_error = None;
}

#[given(regex = r#"^a trip "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn given_trip(world: &mut AppWorld, name: String, start: String, end: String) {
    let input = CreateTrip {
        name: Some(name),
        start_date: Some(start),
        end_date: Some(end),
    };
    let trip = world.planner().create_trip(&input).await.expect("create trip");
    world.trip = Some(trip);
}

#[given(regex = r#"^a destination "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn given_destination(world: &mut AppWorld, location: String, arrival: String, departure: String) {
    add_destination(world, location, arrival, departure)
        .await
        .expect("add destination");
}

#[given(regex = r#"^an activity "([^"]+)" at "([^"]+)" in "([^"]+)"$"#)]
async fn given_activity(world: &mut AppWorld, title: String, time: String, location: String) {
    add_activity(world, title, time, location)
        .await
        .expect("add activity");
}

#[given(regex = r#"^an accommodation "([^"]+)" from "([^"]+)" to "([^"]+)" in "([^"]+)"$"#)]
async fn given_accommodation(
    world: &mut AppWorld,
    place: String,
    check_in: String,
    check_out: String,
    location: String,
) {
    add_accommodation(world, place, check_in, check_out, location)
        .await
        .expect("add accommodation");
}

#[when(regex = r#"^I add a destination "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn when_add_destination(world: &mut AppWorld, location: String, arrival: String, departure: String) {
    add_destination(world, location, arrival, departure)
        .await
        .expect("add destination");
}

#[when(regex = r#"^I try to add a destination "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn when_try_add_destination(
    world: &mut AppWorld,
    location: String,
    arrival: String,
    departure: String,
) {
    let result = add_destination(world, location, arrival, departure).await;
    world.last_error = result.err();
}

#[when(regex = r#"^I add an activity "([^"]+)" at "([^"]+)" to "([^"]+)"$"#)]
async fn when_add_activity(world: &mut AppWorld, title: String, time: String, location: String) {
    add_activity(world, title, time, location)
        .await
        .expect("add activity");
}

#[when(regex = r#"^I try to add an activity "([^"]+)" at "([^"]+)" to "([^"]+)"$"#)]
async fn when_try_add_activity(world: &mut AppWorld, title: String, time: String, location: String) {
    let result = add_activity(world, title, time, location).await;
    world.last_error = result.err();
}

#[when(regex = r#"^I add an accommodation "([^"]+)" from "([^"]+)" to "([^"]+)" to "([^"]+)"$"#)]
async fn when_add_accommodation(
    world: &mut AppWorld,
    place: String,
    check_in: String,
    check_out: String,
    location: String,
) {
    add_accommodation(world, place, check_in, check_out, location)
        .await
        .expect("add accommodation");
}

#[when("I delete the trip")]
async fn when_delete_trip(world: &mut AppWorld) {
    let trip_id = world.trip().id;
    let removed = world.planner().delete_trip(trip_id).await.expect("delete trip");
    assert!(removed);
}

#[then(regex = r"^the trip has (\d+) destinations?$")]
async fn then_destination_count(world: &mut AppWorld, expected: usize) {
    let detail = world
        .planner()
        .trip_detail(world.trip().id)
        .await
        .expect("trip detail");
    assert_eq!(detail.destinations.len(), expected);
}

#[then(regex = r#"^"([^"]+)" has an activity titled "([^"]+)"$"#)]
async fn then_has_activity(world: &mut AppWorld, location: String, title: String) {
    let titles = activity_titles(world, &location).await;
    assert!(titles.contains(&title), "{titles:?} lacks {title}");
}

#[then(regex = r#"^"([^"]+)" has (\d+) activities$"#)]
async fn then_activity_count(world: &mut AppWorld, location: String, expected: usize) {
    assert_eq!(activity_titles(world, &location).await.len(), expected);
}

#[then(regex = r"^the trip lasts (\d+) days$")]
async fn then_trip_duration(world: &mut AppWorld, expected: i64) {
    assert_eq!(world.trip().duration, expected);
}

#[then(regex = r#"^the request fails with "([^"]+)"$"#)]
async fn then_request_fails(world: &mut AppWorld, message: String) {
    let err = world.last_error.as_ref().expect("the request should have failed");
    assert!(matches!(err, AppError::Validation(_)), "unexpected error {err:?}");
    assert!(
        err.to_string().contains(&message),
        "{err} does not mention {message}"
    );
}

#[then(regex = r#"^the accommodation "([^"]+)" lasts (\d+) nights$"#)]
async fn then_accommodation_nights(world: &mut AppWorld, place: String, expected: i64) {
    let stay = world
        .accommodations
        .get(&place)
        .unwrap_or_else(|| panic!("unknown accommodation {place}"));
    assert_eq!(stay.nights, expected);
}

#[then("the trip is gone")]
async fn then_trip_gone(world: &mut AppWorld) {
    let result = world.planner().trip_detail(world.trip().id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[then(regex = r#"^"([^"]+)" is gone$"#)]
async fn then_destination_gone(world: &mut AppWorld, location: String) {
    let destination_id = world.destination(&location).id;
    let result = world.planner().find_destination(destination_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let repos = world.planner().repos();
    let activities = repos
        .activities
        .list_by_parent(destination_id)
        .await
        .expect("list activities");
    assert!(activities.is_empty());
    let stays = repos
        .accommodations
        .list_by_parent(destination_id)
        .await
        .expect("list accommodations");
    assert!(stays.is_empty());
}

#[then("deleting the trip again reports nothing removed")]
async fn then_second_delete_is_noop(world: &mut AppWorld) {
    let removed = world
        .planner()
        .delete_trip(world.trip().id)
        .await
        .expect("second delete");
    assert!(!removed);
}

async fn add_destination(
    world: &mut AppWorld,
    location: String,
    arrival: String,
    departure: String,
) -> Result<(), AppError> {
    let input = CreateDestination {
        location: Some(location.clone()),
        arrival_date: Some(arrival),
        departure_date: Some(departure),
    };
    let destination = world.planner().add_destination(world.trip().id, &input).await?;
    world.destinations.insert(location, destination);
    Ok(())
}

async fn add_activity(
    world: &mut AppWorld,
    title: String,
    time: String,
    location: String,
) -> Result<(), AppError> {
    let input = CreateActivity {
        title: Some(title),
        time: Some(time),
        notes: None,
    };
    let destination_id = world.destination(&location).id;
    world.planner().add_activity(destination_id, &input).await?;
    Ok(())
}

async fn add_accommodation(
    world: &mut AppWorld,
    place: String,
    check_in: String,
    check_out: String,
    location: String,
) -> Result<(), AppError> {
    let input = CreateAccommodation {
        place_name: Some(place.clone()),
        check_in: Some(check_in),
        check_out: Some(check_out),
        notes: None,
    };
    let destination_id = world.destination(&location).id;
    let stay = world
        .planner()
        .add_accommodation(destination_id, &input)
        .await?;
    world.accommodations.insert(place, stay);
    Ok(())
}

async fn activity_titles(world: &AppWorld, location: &str) -> Vec<String> {
    let detail = world
        .planner()
        .trip_detail(world.trip().id)
        .await
        .expect("trip detail");
    detail
        .destinations
        .into_iter()
        .find(|entry| entry.destination.location == location)
        .map(|entry| entry.activities.into_iter().map(|a| a.title).collect())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
