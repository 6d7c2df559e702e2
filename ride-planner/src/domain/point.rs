//! Geographic coordinate type.

use std::fmt;

use serde::Serialize;

/// Error returned when constructing an invalid geographic point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidPoint {
    reason: &'static str,
}

/// A geographic coordinate in canonical latitude, longitude order.
///
/// Latitude is in degrees within [-90, 90], longitude within [-180, 180],
/// and both components are finite. This type guarantees that any
/// `GeoPoint` value is valid by construction.
///
/// # Examples
///
/// ```
/// use ride_planner::domain::GeoPoint;
///
/// let kolomna = GeoPoint::new(55.095276, 38.765574).unwrap();
/// assert_eq!(kolomna.lat(), 55.095276);
/// assert_eq!(kolomna.lng(), 38.765574);
///
/// // Out-of-range latitude is rejected
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
///
/// // Non-finite components are rejected
/// assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Construct a point from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidPoint> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidPoint {
                reason: "components must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidPoint {
                reason: "latitude must be within [-90, 90] degrees",
            });
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidPoint {
                reason: "longitude must be within [-180, 180] degrees",
            });
        }

        Ok(GeoPoint { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_valid_points() {
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
        assert!(GeoPoint::new(55.7558, 37.6176).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn reject_out_of_range_latitude() {
        assert!(GeoPoint::new(90.0001, 0.0).is_err());
        assert!(GeoPoint::new(-90.0001, 0.0).is_err());
    }

    #[test]
    fn reject_out_of_range_longitude() {
        assert!(GeoPoint::new(0.0, 180.0001).is_err());
        assert!(GeoPoint::new(0.0, -180.0001).is_err());
    }

    #[test]
    fn reject_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
        assert!(GeoPoint::new(f64::INFINITY, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn accessors() {
        let p = GeoPoint::new(55.095276, 38.765574).unwrap();
        assert_eq!(p.lat(), 55.095276);
        assert_eq!(p.lng(), 38.765574);
    }

    #[test]
    fn display() {
        let p = GeoPoint::new(55.095276, 38.765574).unwrap();
        assert_eq!(format!("{}", p), "(55.0953, 38.7656)");
    }

    #[test]
    fn equality() {
        let a = GeoPoint::new(55.0, 38.0).unwrap();
        let b = GeoPoint::new(55.0, 38.0).unwrap();
        let c = GeoPoint::new(55.1, 38.1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
