//! Route service abstraction.

use std::future::Future;

use crate::domain::GeoPoint;

use super::convert::ComputedRoute;
use super::error::RoutingError;

/// Anything that can turn a (start, end) pair into a computed route.
///
/// The HTTP client, the caching wrapper, and the test mock all implement
/// this; the computer and planner only ever see the trait.
pub trait RouteService: Send + Sync + 'static {
    /// Compute a route from `start` to `end`.
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<ComputedRoute, RoutingError>> + Send;
}
