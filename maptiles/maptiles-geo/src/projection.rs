//! Spherical Web Mercator (EPSG:3857).
//!
//! Longitude maps linearly to `x`; latitude goes through the Mercator
//! stretch `ln(tan(π/4 + φ/2))`, which diverges at the poles.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::error::{GeoError, GeoResult};
use crate::types::{GeoPoint, PlanarPoint};

/// Radius of the reference sphere in metres (WGS 84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the equatorial circumference. The projected world spans
/// `±HALF_CIRCUMFERENCE` on both axes.
pub const HALF_CIRCUMFERENCE: f64 = PI * EARTH_RADIUS;

/// Latitude at which the projected world becomes square, `atan(sinh(π))`.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project a geographic point to planar metres.
///
/// # Errors
///
/// Returns [`GeoError::ProjectionDomain`] for latitudes at or beyond ±90°
/// and for non-finite coordinates.
pub fn to_planar(point: GeoPoint) -> GeoResult<PlanarPoint> {
    if !point.lat.is_finite() || !point.lon.is_finite() || point.lat.abs() >= 90.0 {
        return Err(GeoError::ProjectionDomain {
            latitude: point.lat,
            longitude: point.lon,
        });
    }

    let x = EARTH_RADIUS * point.lon.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + point.lat.to_radians() / 2.0).tan().ln();
    Ok(PlanarPoint::new(x, y))
}

/// Unproject planar metres back to a geographic point.
#[must_use]
pub fn to_geo(point: PlanarPoint) -> GeoPoint {
    let lon = (point.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    GeoPoint::new(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} differs from {expected} by more than {tolerance}"
        );
    }

    #[test]
    fn test_origin_projects_to_origin() {
        let p = to_planar(GeoPoint::new(0.0, 0.0)).unwrap();
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
    }

    #[test]
    fn test_antimeridian_is_half_circumference() {
        let p = to_planar(GeoPoint::new(0.0, 180.0)).unwrap();
        assert_close(p.x, HALF_CIRCUMFERENCE, 1e-6);
    }

    #[test]
    fn test_max_latitude_is_square() {
        let north = to_planar(GeoPoint::new(MAX_LATITUDE, 0.0)).unwrap();
        let south = to_planar(GeoPoint::new(-MAX_LATITUDE, 0.0)).unwrap();
        assert_close(north.y, HALF_CIRCUMFERENCE, 1e-3);
        assert_close(south.y, -HALF_CIRCUMFERENCE, 1e-3);
    }

    #[test]
    fn test_north_is_up() {
        let rome = to_planar(GeoPoint::new(41.8988, 12.5451)).unwrap();
        let berlin = to_planar(GeoPoint::new(52.51695, 13.38943)).unwrap();
        assert!(berlin.y > rome.y);
        assert!(berlin.x > rome.x);
    }

    #[test]
    fn test_poles_are_outside_the_domain() {
        for lat in [90.0, -90.0] {
            let result = to_planar(GeoPoint::new(lat, 10.0));
            assert!(matches!(
                result,
                Err(GeoError::ProjectionDomain { latitude, .. }) if latitude == lat
            ));
        }
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        assert!(to_planar(GeoPoint::new(f64::NAN, 0.0)).is_err());
        assert!(to_planar(GeoPoint::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_to_geo_of_square_corner() {
        let corner = to_geo(PlanarPoint::new(-HALF_CIRCUMFERENCE, HALF_CIRCUMFERENCE));
        assert_close(corner.lat, MAX_LATITUDE, 1e-9);
        assert_close(corner.lon, -180.0, 1e-9);
    }

    proptest! {
        #[test]
        fn prop_projection_round_trips(lat in -84.999f64..84.999, lon in -179.999f64..=180.0) {
            let back = to_geo(to_planar(GeoPoint::new(lat, lon)).unwrap());
            prop_assert!((back.lat - lat).abs() <= 1e-6 * lat.abs().max(1.0));
            prop_assert!((back.lon - lon).abs() <= 1e-6 * lon.abs().max(1.0));
        }
    }
}
