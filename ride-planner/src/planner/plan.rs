//! The route plan aggregate.

use serde::Serialize;

use crate::domain::{GeoPoint, RouteSummary};

/// Where the route's start point comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StartSource {
    /// Nothing known yet; flips to `Gps` once a live location is first
    /// available.
    #[default]
    None,
    /// Follow the live (throttled) location.
    Gps,
    /// A user-fixed point.
    Custom,
}

/// Lifecycle of the current route computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RoutingStatus {
    /// No computation wanted (an endpoint is missing).
    #[default]
    Idle,
    /// A request is outstanding.
    Computing,
    /// The displayed geometry is the latest request's answer.
    Success,
    /// The latest request failed; geometry is cleared.
    Failed,
}

/// The single live route plan.
///
/// Created once with defaults, mutated only by the planner's operations,
/// and published as a snapshot after every mutation. Geometry is non-empty
/// only while both endpoints are set and the last computation succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Where the start point comes from.
    pub start_source: StartSource,

    /// User-fixed start point, or the value frozen by a lock.
    pub custom_start: Option<GeoPoint>,

    /// Chosen destination.
    pub destination: Option<GeoPoint>,

    /// Whether the start value is frozen against live updates.
    pub locked: bool,

    /// Whether the next map click picks the start instead of the
    /// destination.
    pub selecting_start: bool,

    /// Route path vertices in canonical lat,lng order.
    pub geometry: Vec<GeoPoint>,

    /// Distance and duration of the displayed route.
    pub summary: Option<RouteSummary>,

    /// Computation lifecycle state.
    pub status: RoutingStatus,
}

impl RoutePlan {
    /// The coordinate actually used as the route start, given the live
    /// throttled location.
    ///
    /// Locked plans read the frozen value (`custom_start`), falling back
    /// to the live location only for a GPS lock taken before any value
    /// was snapshotted. Unlocked plans read `custom_start` for a custom
    /// source and the live location otherwise.
    pub fn effective_start(&self, live: Option<GeoPoint>) -> Option<GeoPoint> {
        match (self.locked, self.start_source) {
            (_, StartSource::Custom) => self.custom_start,
            (true, StartSource::Gps) => self.custom_start.or(live),
            _ => live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn defaults() {
        let plan = RoutePlan::default();
        assert_eq!(plan.start_source, StartSource::None);
        assert_eq!(plan.custom_start, None);
        assert_eq!(plan.destination, None);
        assert!(!plan.locked);
        assert!(!plan.selecting_start);
        assert!(plan.geometry.is_empty());
        assert_eq!(plan.summary, None);
        assert_eq!(plan.status, RoutingStatus::Idle);
    }

    #[test]
    fn effective_start_unlocked_follows_live() {
        let mut plan = RoutePlan {
            start_source: StartSource::Gps,
            ..RoutePlan::default()
        };

        let live = point(55.0, 38.0);
        assert_eq!(plan.effective_start(Some(live)), Some(live));
        assert_eq!(plan.effective_start(None), None);

        // A stale snapshot is ignored while unlocked under GPS.
        plan.custom_start = Some(point(10.0, 10.0));
        assert_eq!(plan.effective_start(Some(live)), Some(live));
    }

    #[test]
    fn effective_start_custom_ignores_live() {
        let custom = point(54.0, 37.0);
        let live = point(55.0, 38.0);

        for locked in [false, true] {
            let plan = RoutePlan {
                start_source: StartSource::Custom,
                custom_start: Some(custom),
                locked,
                ..RoutePlan::default()
            };
            assert_eq!(plan.effective_start(Some(live)), Some(custom));
        }
    }

    #[test]
    fn effective_start_locked_gps_prefers_snapshot() {
        let snapshot = point(54.0, 37.0);
        let live = point(55.0, 38.0);

        let plan = RoutePlan {
            start_source: StartSource::Gps,
            custom_start: Some(snapshot),
            locked: true,
            ..RoutePlan::default()
        };
        assert_eq!(plan.effective_start(Some(live)), Some(snapshot));

        // Without a snapshot, a locked GPS start falls back to live.
        let plan = RoutePlan {
            start_source: StartSource::Gps,
            custom_start: None,
            locked: true,
            ..RoutePlan::default()
        };
        assert_eq!(plan.effective_start(Some(live)), Some(live));
    }

    #[test]
    fn effective_start_without_source_follows_live() {
        let live = point(55.0, 38.0);
        let plan = RoutePlan::default();
        assert_eq!(plan.effective_start(Some(live)), Some(live));
    }
}
