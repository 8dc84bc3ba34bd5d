//! Geographic primitives
//!
//! Provides the [`GeoPoint`] coordinate type and great-circle distance on a
//! spherical Earth. Reference points and events span arbitrary latitudes and
//! longitudes, so planar distance in degrees is never used.

mod types;

pub use types::{GeoError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
///
/// Uses the haversine formula. The result is symmetric in its arguments and
/// exactly zero when both points are equal. The haversine term is clamped to
/// `[0, 1]` so rounding on near-antipodal points cannot produce NaN; NaN
/// coordinates propagate to a NaN distance.
#[inline]
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn km(meters: f64) -> f64 {
        meters / 1000.0
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let tokyo = GeoPoint::new(35.6895, 139.6917);
        assert_eq!(distance_meters(tokyo, tokyo), 0.0);
    }

    #[test]
    fn test_half_degree_along_equator() {
        let d = distance_meters(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.5));
        assert!((km(d) - 55.6).abs() < 0.1, "Expected ~55.6 km, got {}", km(d));
    }

    #[test]
    fn test_london_to_paris() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let d = km(distance_meters(london, paris));
        assert!((d - 343.5).abs() < 2.0, "Expected ~343 km, got {}", d);
    }

    #[test]
    fn test_crosses_antimeridian() {
        // 179.5E to 179.5W is one degree of longitude, not 359
        let east = GeoPoint::new(0.0, 179.5);
        let west = GeoPoint::new(0.0, -179.5);
        let d = km(distance_meters(east, west));
        assert!((d - 111.2).abs() < 0.5, "Expected ~111 km, got {}", d);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let d = distance_meters(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!(d.is_finite());
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        let d = distance_meters(GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, 0.0));
        assert!(d.is_nan());
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::validated(91.0, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::validated(0.0, -180.5),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(matches!(
            GeoPoint::validated(f64::NAN, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(GeoPoint::validated(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_display_uses_hemispheres() {
        let p = GeoPoint::new(-33.8688, 151.2093);
        assert_eq!(p.to_string(), "33.869°S 151.209°E");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_is_symmetric(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let a = GeoPoint::new(lat1, lon1);
                let b = GeoPoint::new(lat2, lon2);
                let ab = distance_meters(a, b);
                let ba = distance_meters(b, a);
                prop_assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
            }

            #[test]
            fn test_distance_is_bounded(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let d = distance_meters(GeoPoint::new(lat1, lon1), GeoPoint::new(lat2, lon2));
                prop_assert!(d >= 0.0);
                prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1.0);
            }

            #[test]
            fn test_distance_to_self_is_zero_everywhere(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
            ) {
                let p = GeoPoint::new(lat, lon);
                prop_assert_eq!(distance_meters(p, p), 0.0);
            }
        }
    }
}
