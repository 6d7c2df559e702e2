//! The route-planning state machine and its aggregate.

mod plan;
mod planner;

pub use plan::{RoutePlan, RoutingStatus, StartSource};
pub use planner::{PlanError, PlannerCommand, RoutePlanner};
