//! Session wiring: tracker → throttle → planner.
//!
//! One spawned task per component, channels in between, and two small
//! command handles for the presentation layer. Dropping the session (and
//! with it the command senders) closes the channels; each task exits and
//! the tracker drops its position subscription on the way out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::domain::{GeoPoint, LocationSample};
use crate::notice::Notice;
use crate::planner::{PlannerCommand, RoutePlan, RoutePlanner};
use crate::routing::RouteService;
use crate::throttle::{DEFAULT_INTERVAL, LocationThrottle};
use crate::tracker::{LocationProvider, LocationTracker, TrackerCommand, TrackerStatus};

/// Command buffer per handle; senders await when it is full.
const COMMAND_BUFFER: usize = 16;

/// Session-level configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period of the location throttle.
    pub throttle_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            throttle_interval: DEFAULT_INTERVAL,
        }
    }
}

/// Command surface of the tracker task.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    commands: mpsc::Sender<TrackerCommand>,
}

impl TrackerHandle {
    /// Open (or replace) the position subscription.
    pub async fn start(&self) {
        let _ = self.commands.send(TrackerCommand::Start).await;
    }

    /// Cancel the subscription, keeping the last known sample.
    pub async fn stop(&self) {
        let _ = self.commands.send(TrackerCommand::Stop).await;
    }
}

/// Command surface of the planner task.
#[derive(Debug, Clone)]
pub struct PlannerHandle {
    commands: mpsc::Sender<PlannerCommand>,
}

impl PlannerHandle {
    /// Forward a raw map click.
    pub async fn map_click(&self, point: GeoPoint) {
        let _ = self.commands.send(PlannerCommand::MapClick(point)).await;
    }

    /// Make the next map click pick the start point.
    pub async fn enter_start_selection(&self) {
        let _ = self
            .commands
            .send(PlannerCommand::EnterStartSelection)
            .await;
    }

    /// Return the start point to GPS following.
    pub async fn set_gps_start_source(&self) {
        let _ = self.commands.send(PlannerCommand::SetGpsStartSource).await;
    }

    /// Freeze the current start value.
    pub async fn lock_route(&self) {
        let _ = self.commands.send(PlannerCommand::LockRoute).await;
    }

    /// Set or clear the destination directly.
    pub async fn set_destination(&self, point: Option<GeoPoint>) {
        let _ = self
            .commands
            .send(PlannerCommand::SetDestination(point))
            .await;
    }

    /// Reset endpoints, selection state, and the route.
    pub async fn clear_all(&self) {
        let _ = self.commands.send(PlannerCommand::ClearAll).await;
    }
}

/// A running planning session.
pub struct NavSession {
    /// Tracker commands.
    pub tracker: TrackerHandle,

    /// Planner commands.
    pub planner: PlannerHandle,

    /// Merged one-shot notifications from tracker and planner.
    pub notices: mpsc::UnboundedReceiver<Notice>,

    plan_rx: watch::Receiver<RoutePlan>,
    samples_rx: watch::Receiver<Option<LocationSample>>,
    status_rx: watch::Receiver<TrackerStatus>,
}

impl NavSession {
    /// Wire and spawn the full stack over a location provider and a
    /// routing service.
    pub fn start<P, S>(provider: P, service: S, config: SessionConfig) -> Self
    where
        P: LocationProvider,
        S: RouteService,
    {
        let (notice_tx, notices) = mpsc::unbounded_channel();

        let tracker = LocationTracker::new(Arc::new(provider), notice_tx.clone());
        let samples_rx = tracker.samples();
        let status_rx = tracker.status_watch();
        let (tracker_tx, tracker_cmds) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(tracker.run(tracker_cmds));

        let throttled =
            LocationThrottle::new(config.throttle_interval).spawn(samples_rx.clone());

        let (planner, outcomes) = RoutePlanner::new(service, notice_tx);
        let plan_rx = planner.plan_watch();
        let (planner_tx, planner_cmds) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(planner.run(planner_cmds, throttled, outcomes));

        Self {
            tracker: TrackerHandle {
                commands: tracker_tx,
            },
            planner: PlannerHandle {
                commands: planner_tx,
            },
            notices,
            plan_rx,
            samples_rx,
            status_rx,
        }
    }

    /// Plan snapshots, one per mutation.
    pub fn plan(&self) -> watch::Receiver<RoutePlan> {
        self.plan_rx.clone()
    }

    /// Raw (unthrottled) sample stream, for the live position marker.
    pub fn samples(&self) -> watch::Receiver<Option<LocationSample>> {
        self.samples_rx.clone()
    }

    /// Tracker status stream.
    pub fn tracker_status(&self) -> watch::Receiver<TrackerStatus> {
        self.status_rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteSummary;
    use crate::planner::RoutingStatus;
    use crate::routing::{ComputedRoute, MockRouteService, RouteFailure, RoutingError};
    use crate::tracker::{MockLocationProvider, PermissionState};
    use chrono::Utc;
    use tokio::time::advance;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn sample(lat: f64, lng: f64) -> LocationSample {
        LocationSample::new(point(lat, lng), Utc::now())
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn click_to_route_end_to_end() {
        let provider = MockLocationProvider::new(true, PermissionState::Granted);
        let service = MockRouteService::new();
        service.push_response(Ok(ComputedRoute {
            points: vec![point(55.0, 38.0), point(55.05, 38.05), point(55.1, 38.1)],
            summary: RouteSummary::new(15230.0, 2400.0),
        }));

        let session =
            NavSession::start(provider.clone(), service, SessionConfig::default());
        let mut plans = session.plan();
        settle().await;

        // The tracker auto-started; the first sample flows straight
        // through the throttle.
        provider.push_sample(sample(55.0, 38.0));
        settle().await;

        session.planner.map_click(point(55.1, 38.1)).await;

        loop {
            plans.changed().await.unwrap();
            let plan = plans.borrow_and_update().clone();
            if plan.status == RoutingStatus::Success {
                assert_eq!(
                    plan.geometry,
                    vec![point(55.0, 38.0), point(55.05, 38.05), point(55.1, 38.1)]
                );
                let summary = plan.summary.unwrap();
                assert_eq!(summary.distance_label(), "15.23 km");
                assert_eq!(summary.duration_label(), "40 min");
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn locked_start_survives_movement_end_to_end() {
        let provider = MockLocationProvider::new(true, PermissionState::Granted);
        let service = MockRouteService::new();

        let session =
            NavSession::start(provider.clone(), service.clone(), SessionConfig::default());
        let mut plans = session.plan();
        settle().await;

        provider.push_sample(sample(55.0, 38.0));
        settle().await;
        session.planner.map_click(point(55.1, 38.1)).await;
        loop {
            plans.changed().await.unwrap();
            if plans.borrow_and_update().status == RoutingStatus::Success {
                break;
            }
        }
        let calls_before = service.call_count();

        session.planner.lock_route().await;
        settle().await;

        // The rider moves; the throttle lets the new sample through after
        // a quiet period, but the locked start keeps the old value and no
        // request is issued.
        provider.push_sample(sample(55.5, 38.5));
        settle().await;
        advance(DEFAULT_INTERVAL).await;
        settle().await;

        let plan = plans.borrow().clone();
        assert!(plan.locked);
        assert_eq!(plan.custom_start, Some(point(55.0, 38.0)));
        assert_eq!(service.call_count(), calls_before);
    }

    #[tokio::test(start_paused = true)]
    async fn routing_failure_notice_reaches_the_session() {
        let provider = MockLocationProvider::new(true, PermissionState::Granted);
        let service = MockRouteService::new();
        service.push_response(Err(RoutingError::NoRoute));

        let mut session =
            NavSession::start(provider.clone(), service, SessionConfig::default());
        let mut plans = session.plan();
        settle().await;

        provider.push_sample(sample(55.0, 38.0));
        settle().await;
        session.planner.map_click(point(55.1, 38.1)).await;

        loop {
            plans.changed().await.unwrap();
            if plans.borrow_and_update().status == RoutingStatus::Failed {
                break;
            }
        }

        assert_eq!(
            session.notices.recv().await,
            Some(Notice::RoutingFailed(RouteFailure::NoRoute))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_stop_keeps_last_sample_visible() {
        let provider = MockLocationProvider::new(true, PermissionState::Granted);
        let service = MockRouteService::new();

        let session =
            NavSession::start(provider.clone(), service, SessionConfig::default());
        let samples = session.samples();
        let mut status = session.tracker_status();
        settle().await;

        provider.push_sample(sample(55.0, 38.0));
        settle().await;

        session.tracker.stop().await;
        loop {
            status.changed().await.unwrap();
            if *status.borrow_and_update() == TrackerStatus::Idle {
                break;
            }
        }

        assert_eq!(samples.borrow().map(|s| s.point), Some(point(55.0, 38.0)));

        // And a restart opens a fresh subscription.
        session.tracker.start().await;
        loop {
            status.changed().await.unwrap();
            if *status.borrow_and_update() == TrackerStatus::Tracking {
                break;
            }
        }
        assert_eq!(provider.open_count(), 2);
    }
}
