pub mod itinerary;
pub mod planner;

pub use itinerary::{DayItem, DayPlan, DestinationDetail, DestinationStop, TripDetail, TripSummary};
pub use planner::PlannerService;
