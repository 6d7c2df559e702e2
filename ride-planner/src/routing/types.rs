//! OSRM wire types.
//!
//! The route endpoint returns GeoJSON-style geometry, which puts
//! coordinates in lng,lat order; conversion to canonical order happens in
//! [`super::convert`], never here.

use serde::Deserialize;

/// Top-level response from the route endpoint.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// "Ok" on success; anything else is a failure.
    pub code: String,

    /// Candidate routes, best first. Absent on failure responses.
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// One candidate route.
#[derive(Debug, Deserialize)]
pub struct RouteDto {
    /// Route length in meters.
    pub distance: f64,

    /// Expected travel time in seconds.
    pub duration: f64,

    pub geometry: GeometryDto,
}

/// GeoJSON LineString geometry.
#[derive(Debug, Deserialize)]
pub struct GeometryDto {
    /// Vertices in lng,lat order.
    pub coordinates: Vec<[f64; 2]>,
}
