//! Route summary metrics and their display labels.

use serde::Serialize;

/// Total distance and duration of a computed route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Route length in meters.
    pub distance_meters: f64,

    /// Expected travel time in seconds.
    pub duration_seconds: f64,
}

impl RouteSummary {
    /// Create a summary from raw service metrics.
    pub fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }

    /// Distance label in kilometres with two decimals, e.g. "15.23 km".
    pub fn distance_label(&self) -> String {
        format!("{:.2} km", self.distance_meters / 1000.0)
    }

    /// Duration label in whole minutes, rounded, e.g. "40 min".
    pub fn duration_label(&self) -> String {
        format!("{} min", (self.duration_seconds / 60.0).round() as i64)
    }
}
