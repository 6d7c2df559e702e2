//! Caching layer for route responses.
//!
//! The planner re-requests identical (start, end) pairs more often than
//! one might expect: lock/unlock toggles and repeated clicks on the same
//! destination all resynchronize the same pair. A short-TTL cache bounds
//! the duplicate calls to the rate-limited public routing server.
//!
//! Endpoints are quantized to 1e-5 degrees (about a meter) so that keys
//! are hashable and float noise below GPS resolution shares an entry.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::GeoPoint;

use super::convert::ComputedRoute;
use super::error::RoutingError;
use super::service::RouteService;

/// Cache key: both endpoints, quantized.
type RouteKey = (i64, i64, i64, i64);

/// Quantization factor: 1e-5 degrees per step.
const QUANT: f64 = 1e5;

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct RouteCacheConfig {
    /// TTL for cached routes.
    pub ttl: Duration,

    /// Maximum number of cached routes.
    pub max_capacity: u64,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 256,
        }
    }
}

/// Route service wrapper that caches successful computations.
///
/// Failures are never cached: a retry always goes back to the service.
pub struct CachedRouteService<S> {
    service: S,
    cache: MokaCache<RouteKey, Arc<ComputedRoute>>,
}

impl<S: RouteService> CachedRouteService<S> {
    /// Wrap a service with the given cache configuration.
    pub fn new(service: S, config: &RouteCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { service, cache }
    }

    fn key(start: GeoPoint, end: GeoPoint) -> RouteKey {
        (
            (start.lat() * QUANT).round() as i64,
            (start.lng() * QUANT).round() as i64,
            (end.lat() * QUANT).round() as i64,
            (end.lng() * QUANT).round() as i64,
        )
    }

    /// Compute a route, serving repeats from cache.
    pub async fn fetch(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<ComputedRoute, RoutingError> {
        let key = Self::key(start, end);

        if let Some(hit) = self.cache.get(&key).await {
            trace!(%start, %end, "route cache hit");
            return Ok((*hit).clone());
        }

        let route = self.service.fetch_route(start, end).await?;
        self.cache.insert(key, Arc::new(route.clone())).await;
        Ok(route)
    }

    /// Number of cached routes (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Drop all cached routes.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: RouteService> RouteService for CachedRouteService<S> {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<ComputedRoute, RoutingError>> + Send {
        self.fetch(start, end)
    }
}
