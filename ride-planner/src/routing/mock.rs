//! Scripted route service for tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::domain::{GeoPoint, RouteSummary};

use super::convert::ComputedRoute;
use super::error::RoutingError;
use super::service::RouteService;

/// Scripted [`RouteService`].
///
/// In immediate mode every call answers from a queued response (or a
/// synthetic two-point route when the queue is empty). In held mode every
/// call parks until [`MockRouteService::resolve`] releases it, which lets
/// tests resolve requests in any order.
#[derive(Clone)]
pub struct MockRouteService {
    inner: Arc<Inner>,
}

struct Inner {
    held: bool,
    responses: Mutex<VecDeque<Result<ComputedRoute, RoutingError>>>,
    calls: Mutex<Vec<(GeoPoint, GeoPoint)>>,
    pending: Mutex<Vec<Option<oneshot::Sender<Result<ComputedRoute, RoutingError>>>>>,
}

/// Synthetic route used when no response is scripted: the straight
/// two-point path between the endpoints.
pub fn direct_route(start: GeoPoint, end: GeoPoint) -> ComputedRoute {
    ComputedRoute {
        points: vec![start, end],
        summary: RouteSummary::new(1000.0, 600.0),
    }
}

impl MockRouteService {
    /// Create a service answering immediately.
    pub fn new() -> Self {
        Self::with_mode(false)
    }

    /// Create a service that parks every call until released.
    pub fn held() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(held: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                held,
                responses: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Queue the next immediate-mode response.
    pub fn push_response(&self, result: Result<ComputedRoute, RoutingError>) {
        self.inner.responses.lock().unwrap().push_back(result);
    }

    /// Endpoint pairs of all calls seen so far, in call order.
    pub fn calls(&self) -> Vec<(GeoPoint, GeoPoint)> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Number of calls seen so far.
    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    /// Number of parked held-mode calls not yet resolved.
    pub fn pending_count(&self) -> usize {
        self.inner
            .pending
            .lock()
            .unwrap()
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Release the parked call with the given call index (0-based, in
    /// call order). Panics if that call was never parked or was already
    /// resolved.
    pub fn resolve(&self, index: usize, result: Result<ComputedRoute, RoutingError>) {
        let sender = self.inner.pending.lock().unwrap()[index]
            .take()
            .expect("call already resolved");
        let _ = sender.send(result);
    }
}

impl Default for MockRouteService {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteService for MockRouteService {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<ComputedRoute, RoutingError>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner.calls.lock().unwrap().push((start, end));

            if inner.held {
                let (tx, rx) = oneshot::channel();
                inner.pending.lock().unwrap().push(Some(tx));
                match rx.await {
                    Ok(result) => result,
                    Err(_) => Err(RoutingError::Api {
                        status: 0,
                        message: "mock dropped without resolving".to_string(),
                    }),
                }
            } else if let Some(result) = inner.responses.lock().unwrap().pop_front() {
                result
            } else {
                Ok(direct_route(start, end))
            }
        }
    }
}
