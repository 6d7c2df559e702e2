//! Wire-to-domain conversion for routing responses.

use crate::domain::{GeoPoint, RouteSummary};

use super::error::RoutingError;
use super::types::RouteResponse;

/// A computed route in canonical lat,lng order, plus its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRoute {
    /// Ordered path vertices.
    pub points: Vec<GeoPoint>,

    /// Total distance and duration.
    pub summary: RouteSummary,
}

/// Convert a route response into the best candidate route.
///
/// A non-"Ok" code or an empty candidate list is [`RoutingError::NoRoute`].
/// Wire coordinates arrive in lng,lat order and are swapped into canonical
/// lat,lng; a vertex outside coordinate ranges fails the whole conversion.
pub fn convert_response(response: RouteResponse) -> Result<ComputedRoute, RoutingError> {
    if response.code != "Ok" {
        return Err(RoutingError::NoRoute);
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Err(RoutingError::NoRoute);
    };

    let mut points = Vec::with_capacity(route.geometry.coordinates.len());
    for [lng, lat] in route.geometry.coordinates {
        points.push(GeoPoint::new(lat, lng)?);
    }

    Ok(ComputedRoute {
        points,
        summary: RouteSummary::new(route.distance, route.duration),
    })
}
