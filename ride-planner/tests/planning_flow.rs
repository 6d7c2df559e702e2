//! End-to-end planning flow over mock collaborators.
//!
//! Drives the wired session the way a presentation layer would: watch the
//! plan, click the map, read notices. Component behavior is covered by the
//! unit tests; these check the whole pipeline holds together.

use std::time::Duration;

use chrono::Utc;
use ride_planner::domain::{GeoPoint, LocationSample, RouteSummary};
use ride_planner::notice::Notice;
use ride_planner::planner::{RoutingStatus, StartSource};
use ride_planner::routing::{ComputedRoute, MockRouteService, RouteFailure, RoutingError};
use ride_planner::session::{NavSession, SessionConfig};
use ride_planner::tracker::{MockLocationProvider, PermissionState, PositionErrorKind};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

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
async fn ride_planning_session() {
    init_tracing();

    let provider = MockLocationProvider::new(true, PermissionState::Granted);
    let service = MockRouteService::new();
    service.push_response(Ok(ComputedRoute {
        points: vec![point(55.0, 38.0), point(55.05, 38.05), point(55.1, 38.1)],
        summary: RouteSummary::new(15230.0, 2400.0),
    }));

    let mut session = NavSession::start(
        provider.clone(),
        service.clone(),
        SessionConfig {
            throttle_interval: Duration::from_secs(3),
        },
    );
    let mut plans = session.plan();
    settle().await;

    // GPS comes up; the first fix passes the throttle immediately and the
    // start source flips to following.
    provider.push_sample(sample(55.0, 38.0));
    settle().await;
    assert_eq!(plans.borrow().start_source, StartSource::Gps);

    // Picking a destination computes a route.
    session.planner.map_click(point(55.1, 38.1)).await;
    loop {
        plans.changed().await.unwrap();
        let plan = plans.borrow_and_update().clone();
        if plan.status == RoutingStatus::Success {
            assert_eq!(plan.geometry.len(), 3);
            assert_eq!(plan.summary.unwrap().distance_label(), "15.23 km");
            break;
        }
    }

    // A transient GPS dropout surfaces as a notice but tracking survives.
    provider.push_error(PositionErrorKind::Timeout);
    settle().await;
    assert_eq!(
        session.notices.recv().await,
        Some(Notice::Position(PositionErrorKind::Timeout))
    );

    // An unreachable destination clears the route and reports why.
    service.push_response(Err(RoutingError::NoRoute));
    session.planner.map_click(point(40.0, -3.7)).await;
    loop {
        plans.changed().await.unwrap();
        let plan = plans.borrow_and_update().clone();
        if plan.status == RoutingStatus::Failed {
            assert!(plan.geometry.is_empty());
            assert_eq!(plan.summary, None);
            break;
        }
    }
    assert_eq!(
        session.notices.recv().await,
        Some(Notice::RoutingFailed(RouteFailure::NoRoute))
    );

    // Clearing resets to an unlocked, GPS-following plan.
    session.planner.clear_all().await;
    loop {
        plans.changed().await.unwrap();
        let plan = plans.borrow_and_update().clone();
        if plan.destination.is_none() {
            assert_eq!(plan.start_source, StartSource::Gps);
            assert!(!plan.locked);
            assert_eq!(plan.status, RoutingStatus::Idle);
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn denied_permission_blocks_until_regrant() {
    init_tracing();

    let provider = MockLocationProvider::new(true, PermissionState::Denied);
    let service = MockRouteService::new();

    let session = NavSession::start(provider.clone(), service, SessionConfig::default());
    let mut status = session.tracker_status();
    settle().await;

    assert_eq!(
        *status.borrow_and_update(),
        ride_planner::tracker::TrackerStatus::Denied
    );
    assert_eq!(provider.open_count(), 0);

    // The user flips the permission back on in system settings.
    provider.set_permission(PermissionState::Granted);
    loop {
        status.changed().await.unwrap();
        if *status.borrow_and_update() == ride_planner::tracker::TrackerStatus::Tracking {
            break;
        }
    }
    assert_eq!(provider.open_count(), 1);
}
