//! Route computation against an external routing service.
//!
//! The HTTP client speaks the OSRM v1 route API; everything above it only
//! sees the [`RouteService`] trait, so the cache wrapper and the test mock
//! slot in interchangeably. [`RouteComputer`] adds the supersession layer:
//! only the most recently issued request may update visible state.

mod cache;
mod client;
mod computer;
mod convert;
mod error;
mod mock;
mod service;
mod types;

pub use cache::{CachedRouteService, RouteCacheConfig};
pub use client::{OsrmClient, OsrmConfig, RoutingProfile};
pub use computer::{RequestSeq, RouteComputer, RouteOutcome};
pub use convert::{ComputedRoute, convert_response};
pub use error::{RouteFailure, RoutingError};
pub use mock::{MockRouteService, direct_route};
pub use service::RouteService;
pub use types::{GeometryDto, RouteDto, RouteResponse};
