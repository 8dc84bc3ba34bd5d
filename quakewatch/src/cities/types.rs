//! Reference point and query result types.

use std::fmt;

use crate::geo::GeoPoint;

/// A labelled point in the reference set (a city).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    /// Human-readable label, e.g. the city name.
    pub label: String,
    /// Location of the point.
    pub location: GeoPoint,
}

impl ReferencePoint {
    /// Creates a new reference point.
    pub fn new(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            label: label.into(),
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

/// A reference point paired with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborResult {
    /// The matched reference point.
    pub point: ReferencePoint,
    /// Great-circle distance from the query point, in meters.
    pub distance_meters: f64,
}

impl NeighborResult {
    /// Distance in kilometers.
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

impl fmt::Display for NeighborResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} km)", self.point.label, self.distance_km())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_display() {
        let result = NeighborResult {
            point: ReferencePoint::new("Reykjavik", 64.1466, -21.9426),
            distance_meters: 12_345.0,
        };
        assert_eq!(result.to_string(), "Reykjavik (12.3 km)");
    }
}
