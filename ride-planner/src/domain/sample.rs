//! Location samples delivered by a tracking source.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::GeoPoint;

/// One coordinate-plus-metadata reading from a tracking source.
///
/// Samples are immutable values: each provider callback produces a fresh
/// one and the newest overwrites the previous. No history is retained
/// anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationSample {
    /// Position of the reading.
    pub point: GeoPoint,

    /// When the platform produced the reading.
    pub timestamp: DateTime<Utc>,

    /// Estimated accuracy radius in meters, if the platform reports one.
    pub accuracy: Option<f64>,

    /// Ground speed in meters per second, if known.
    pub speed: Option<f64>,

    /// Heading in degrees clockwise from north, if known.
    pub heading: Option<f64>,
}

impl LocationSample {
    /// Create a sample with no metadata.
    pub fn new(point: GeoPoint, timestamp: DateTime<Utc>) -> Self {
        Self {
            point,
            timestamp,
            accuracy: None,
            speed: None,
            heading: None,
        }
    }

    /// Attach an accuracy estimate in meters.
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Attach a ground speed in meters per second.
    pub fn with_speed(mut self, mps: f64) -> Self {
        self.speed = Some(mps);
        self
    }

    /// Attach a heading in degrees clockwise from north.
    pub fn with_heading(mut self, degrees: f64) -> Self {
        self.heading = Some(degrees);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> GeoPoint {
        GeoPoint::new(55.095276, 38.765574).unwrap()
    }

    #[test]
    fn new_has_no_metadata() {
        let sample = LocationSample::new(point(), Utc::now());
        assert_eq!(sample.accuracy, None);
        assert_eq!(sample.speed, None);
        assert_eq!(sample.heading, None);
    }

    #[test]
    fn builder_attaches_metadata() {
        let sample = LocationSample::new(point(), Utc::now())
            .with_accuracy(12.5)
            .with_speed(4.2)
            .with_heading(270.0);

        assert_eq!(sample.accuracy, Some(12.5));
        assert_eq!(sample.speed, Some(4.2));
        assert_eq!(sample.heading, Some(270.0));
    }
}
