//! The route-planning state machine.
//!
//! Owns the single [`RoutePlan`] and the latest throttled location. All
//! mutation goes through the operation set below; the [`RoutePlanner::run`]
//! task invokes it serially from its three asynchronous inputs (throttled
//! samples, UI commands, routing completions), so there is no concurrent
//! writer anywhere.
//!
//! Recomputation is explicit: every operation ends by comparing the
//! (effective start, destination) pair with the last synchronized pair,
//! and on a change either issues a routing request or clears the route in
//! the same step.

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

use crate::domain::{GeoPoint, LocationSample};
use crate::notice::Notice;
use crate::routing::{RouteComputer, RouteOutcome, RouteService};

use super::plan::{RoutePlan, RoutingStatus, StartSource};

/// Error from a plan operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// `lock_route` requires both endpoints to be set.
    #[error("cannot lock the route without both a start and a destination")]
    MissingEndpoints,
}

/// Command accepted by the planner task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlannerCommand {
    /// A raw map click, uninterpreted by the map layer.
    MapClick(GeoPoint),
    /// Make the next map click pick the start point.
    EnterStartSelection,
    /// Return the start point to GPS following.
    SetGpsStartSource,
    /// Freeze the current start value.
    LockRoute,
    /// Set or clear the destination directly.
    SetDestination(Option<GeoPoint>),
    /// Reset everything except the live location.
    ClearAll,
}

/// The route-planning state machine.
pub struct RoutePlanner<S: RouteService> {
    plan: RoutePlan,
    live: Option<LocationSample>,
    computer: RouteComputer<S>,
    /// The (effective start, destination) pair last acted on.
    synced: (Option<GeoPoint>, Option<GeoPoint>),
    plan_tx: watch::Sender<RoutePlan>,
    notice_tx: mpsc::UnboundedSender<Notice>,
}

impl<S: RouteService> RoutePlanner<S> {
    /// Create a planner over the given routing service, returning its
    /// completion stream alongside it (feed it back via
    /// [`apply_outcome`], or let [`run`] do so).
    ///
    /// [`apply_outcome`]: RoutePlanner::apply_outcome
    /// [`run`]: RoutePlanner::run
    pub fn new(
        service: S,
        notice_tx: mpsc::UnboundedSender<Notice>,
    ) -> (Self, mpsc::UnboundedReceiver<RouteOutcome>) {
        let (computer, outcomes) = RouteComputer::new(service);
        let (plan_tx, _) = watch::channel(RoutePlan::default());

        (
            Self {
                plan: RoutePlan::default(),
                live: None,
                computer,
                synced: (None, None),
                plan_tx,
                notice_tx,
            },
            outcomes,
        )
    }

    /// Snapshot stream; a new value is published after every mutation.
    pub fn plan_watch(&self) -> watch::Receiver<RoutePlan> {
        self.plan_tx.subscribe()
    }

    /// Current plan.
    pub fn plan(&self) -> &RoutePlan {
        &self.plan
    }

    /// Latest throttled location.
    pub fn live_location(&self) -> Option<LocationSample> {
        self.live
    }

    /// The coordinate currently used as the route start.
    pub fn effective_start(&self) -> Option<GeoPoint> {
        self.plan.effective_start(self.live.map(|s| s.point))
    }

    /// A throttled location became available.
    ///
    /// The first known location adopts GPS as the start source.
    pub fn on_live_location(&mut self, sample: LocationSample) {
        self.live = Some(sample);
        if self.plan.start_source == StartSource::None {
            debug!("first location known; start follows GPS");
            self.plan.start_source = StartSource::Gps;
        }
        self.after_mutation();
    }

    /// A map click: picks the start while in selection mode, otherwise
    /// the destination. Either way the plan unlocks.
    pub fn on_map_click(&mut self, point: GeoPoint) {
        if self.plan.selecting_start {
            debug!(%point, "start point picked");
            self.plan.custom_start = Some(point);
            self.plan.start_source = StartSource::Custom;
            self.plan.selecting_start = false;
            self.plan.locked = false;
        } else {
            debug!(%point, "destination picked");
            self.plan.destination = Some(point);
            self.plan.locked = false;
        }
        self.after_mutation();
    }

    /// Make the next map click pick the start point.
    pub fn enter_start_selection(&mut self) {
        self.plan.selecting_start = true;
        self.after_mutation();
    }

    /// Return the start point to GPS following.
    pub fn set_gps_start_source(&mut self) {
        self.plan.start_source = StartSource::Gps;
        self.plan.custom_start = None;
        self.plan.selecting_start = false;
        self.plan.locked = false;
        self.after_mutation();
    }

    /// Freeze the current start value.
    ///
    /// Requires both endpoints; otherwise raises
    /// [`Notice::LockPrecondition`] and changes nothing. Locking a
    /// GPS-following start snapshots the live value into `custom_start`
    /// while the source label stays `Gps`.
    pub fn lock_route(&mut self) -> Result<(), PlanError> {
        if self.effective_start().is_none() || self.plan.destination.is_none() {
            let _ = self.notice_tx.send(Notice::LockPrecondition);
            return Err(PlanError::MissingEndpoints);
        }

        if self.plan.start_source == StartSource::Gps {
            // Freeze the value in use; a second lock is a no-op.
            self.plan.custom_start = self.effective_start();
        }
        self.plan.locked = true;
        self.after_mutation();
        Ok(())
    }

    /// Set or clear the destination. Always unlocks.
    pub fn set_destination(&mut self, point: Option<GeoPoint>) {
        self.plan.destination = point;
        self.plan.locked = false;
        self.after_mutation();
    }

    /// Reset selection state, endpoints, and the route. The live location
    /// is untouched and the start source returns to GPS following.
    pub fn clear_all(&mut self) {
        self.plan.destination = None;
        self.plan.custom_start = None;
        self.plan.start_source = StartSource::Gps;
        self.plan.locked = false;
        self.plan.selecting_start = false;
        self.after_mutation();
    }

    /// Apply a routing completion. Completions that are no longer current
    /// (superseded or invalidated) are dropped without touching the plan.
    pub fn apply_outcome(&mut self, outcome: RouteOutcome) {
        if !self.computer.is_current(outcome.seq) {
            trace!(seq = outcome.seq, "stale routing completion dropped");
            return;
        }

        match outcome.result {
            Ok(route) => {
                debug!(vertices = route.points.len(), "route computed");
                self.plan.geometry = route.points;
                self.plan.summary = Some(route.summary);
                self.plan.status = RoutingStatus::Success;
            }
            Err(err) => {
                warn!(error = %err, "route computation failed");
                self.plan.geometry = Vec::new();
                self.plan.summary = None;
                self.plan.status = RoutingStatus::Failed;
                let _ = self.notice_tx.send(Notice::RoutingFailed(err.failure()));
            }
        }
        self.publish();
    }

    fn after_mutation(&mut self) {
        self.sync_route();
        self.publish();
    }

    /// Decide, in the same step as the mutation, whether the endpoint
    /// pair change needs a new request or a cleared route.
    fn sync_route(&mut self) {
        let pair = (self.effective_start(), self.plan.destination);
        if pair == self.synced {
            return;
        }
        self.synced = pair;

        match pair {
            (Some(start), Some(end)) => {
                self.plan.geometry = Vec::new();
                self.plan.summary = None;
                self.plan.status = RoutingStatus::Computing;
                self.computer.request(start, end);
            }
            _ => {
                self.plan.geometry = Vec::new();
                self.plan.summary = None;
                self.plan.status = RoutingStatus::Idle;
                // An in-flight completion must not resurrect a route
                // whose endpoints are gone.
                self.computer.invalidate();
            }
        }
    }

    fn publish(&self) {
        self.plan_tx.send_replace(self.plan.clone());
    }

    /// Drive the planner over its three inputs until the command channel
    /// closes.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlannerCommand>,
        mut throttled: watch::Receiver<Option<LocationSample>>,
        mut outcomes: mpsc::UnboundedReceiver<RouteOutcome>,
    ) {
        let mut live_open = true;

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                res = throttled.changed(), if live_open => match res {
                    Ok(()) => {
                        let sample = *throttled.borrow_and_update();
                        if let Some(sample) = sample {
                            self.on_live_location(sample);
                        }
                    }
                    Err(_) => live_open = false,
                },
                outcome = outcomes.recv() => match outcome {
                    Some(outcome) => self.apply_outcome(outcome),
                    None => break,
                },
            }
        }
    }

    fn handle_command(&mut self, cmd: PlannerCommand) {
        match cmd {
            PlannerCommand::MapClick(point) => self.on_map_click(point),
            PlannerCommand::EnterStartSelection => self.enter_start_selection(),
            PlannerCommand::SetGpsStartSource => self.set_gps_start_source(),
            PlannerCommand::LockRoute => {
                // The precondition notice is already raised inside.
                let _ = self.lock_route();
            }
            PlannerCommand::SetDestination(point) => self.set_destination(point),
            PlannerCommand::ClearAll => self.clear_all(),
        }
    }
}
