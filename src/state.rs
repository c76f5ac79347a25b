use crate::{db::DbPool, services::PlannerService};

#[derive(Clone)]
pub struct AppState {
    pub planner: PlannerService,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        Self {
            planner: PlannerService::new(db),
        }
    }
}
