//! Route computation with request supersession.
//!
//! The planner can change its mind faster than the network answers. Every
//! issued request is stamped from a monotone counter; completions carry
//! their stamp, and only the stamp of the most recently issued request is
//! current. Superseding a request withdraws interest in its completion:
//! the transport request is left to finish and its result is dropped on
//! arrival, never applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::GeoPoint;

use super::convert::ComputedRoute;
use super::error::RoutingError;
use super::service::RouteService;

/// Issuance stamp of a routing request.
pub type RequestSeq = u64;

/// Completion of a routing request, tagged with its issuance stamp.
#[derive(Debug)]
pub struct RouteOutcome {
    /// Stamp handed out by [`RouteComputer::request`].
    pub seq: RequestSeq,

    /// What the service answered.
    pub result: Result<ComputedRoute, RoutingError>,
}

/// Asynchronous route computation front-end.
///
/// One spawned task per request; completions are delivered on the outcome
/// channel returned by [`RouteComputer::new`] and must be filtered through
/// [`RouteComputer::is_current`] before touching visible state.
pub struct RouteComputer<S> {
    service: Arc<S>,
    seq: Arc<AtomicU64>,
    outcome_tx: mpsc::UnboundedSender<RouteOutcome>,
}

impl<S: RouteService> RouteComputer<S> {
    /// Create a computer over the given service, returning the completion
    /// stream alongside it.
    pub fn new(service: S) -> (Self, mpsc::UnboundedReceiver<RouteOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        (
            Self {
                service: Arc::new(service),
                seq: Arc::new(AtomicU64::new(0)),
                outcome_tx,
            },
            outcome_rx,
        )
    }

    /// Issue a request for the pair, superseding any outstanding one.
    pub fn request(&self, start: GeoPoint, end: GeoPoint) -> RequestSeq {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, %start, %end, "routing request issued");

        let service = Arc::clone(&self.service);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_route(start, end).await;
            let _ = tx.send(RouteOutcome { seq, result });
        });

        seq
    }

    /// Withdraw interest in any outstanding request without issuing a new
    /// one. A completion that arrives afterwards is stale.
    pub fn invalidate(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }

    /// Stamp of the most recently issued request (or invalidation).
    pub fn latest_seq(&self) -> RequestSeq {
        self.seq.load(Ordering::SeqCst)
    }

    /// Whether a completion stamp is still the current one.
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        seq == self.latest_seq()
    }
}
