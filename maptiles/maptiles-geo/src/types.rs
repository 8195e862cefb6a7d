//! Value types shared by the projection and tiling code.

use std::fmt;

use glam::DVec2;

use crate::tile::{TileRange, tile_for_point};

/// A geographic position in degrees.
///
/// Valid points have latitude in [-90, 90] and longitude in (-180, 180].
/// Construction does not check this; see [`GeoPoint::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the point lies in the geographic domain.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && self.lon > -180.0 && self.lon <= 180.0
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A projected position in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<DVec2> for PlanarPoint {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<PlanarPoint> for DVec2 {
    fn from(p: PlanarPoint) -> Self {
        DVec2::new(p.x, p.y)
    }
}

/// Planar rectangle an image is stretched to fill.
///
/// For tiles `min_x`/`max_y` come from the north-west corner and
/// `max_x`/`min_y` from the south-east corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extent {
    /// Extent spanned by a projected north-west and south-east corner.
    #[must_use]
    pub fn from_corners(north_west: PlanarPoint, south_east: PlanarPoint) -> Self {
        Self {
            min_x: north_west.x,
            max_x: south_east.x,
            min_y: south_east.y,
            max_y: north_west.y,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether `point` lies inside the extent, edges included.
    #[must_use]
    pub fn contains(&self, point: PlanarPoint) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}

/// A geographic rectangle given by any two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub first: GeoPoint,
    pub second: GeoPoint,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(first: GeoPoint, second: GeoPoint) -> Self {
        Self { first, second }
    }

    /// Northernmost latitude paired with the westernmost longitude.
    #[must_use]
    pub fn north_west(&self) -> GeoPoint {
        GeoPoint::new(
            self.first.lat.max(self.second.lat),
            self.first.lon.min(self.second.lon),
        )
    }

    /// Southernmost latitude paired with the easternmost longitude.
    #[must_use]
    pub fn south_east(&self) -> GeoPoint {
        GeoPoint::new(
            self.first.lat.min(self.second.lat),
            self.first.lon.max(self.second.lon),
        )
    }

    /// Whether `point` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        let nw = self.north_west();
        let se = self.south_east();
        (se.lat..=nw.lat).contains(&point.lat) && (nw.lon..=se.lon).contains(&point.lon)
    }

    /// Tiles at `zoom` from the tile holding the north-west corner to the
    /// tile holding the south-east corner.
    #[must_use]
    pub fn tile_range(&self, zoom: u8) -> TileRange {
        TileRange::new(
            tile_for_point(self.north_west(), zoom),
            tile_for_point(self.south_east(), zoom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_normalizes_any_corner_order() {
        let forward = BoundingBox::new(GeoPoint::new(55.0, -10.0), GeoPoint::new(30.0, 50.0));
        let reversed = BoundingBox::new(GeoPoint::new(30.0, 50.0), GeoPoint::new(55.0, -10.0));
        let crossed = BoundingBox::new(GeoPoint::new(30.0, -10.0), GeoPoint::new(55.0, 50.0));

        for area in [forward, reversed, crossed] {
            assert_eq!(area.north_west(), GeoPoint::new(55.0, -10.0));
            assert_eq!(area.south_east(), GeoPoint::new(30.0, 50.0));
        }
    }

    #[test]
    fn test_bounding_box_contains() {
        let area = BoundingBox::new(GeoPoint::new(55.0, -10.0), GeoPoint::new(30.0, 50.0));
        assert!(area.contains(GeoPoint::new(41.8988, 12.5451)));
        assert!(area.contains(GeoPoint::new(55.0, -10.0)));
        assert!(!area.contains(GeoPoint::new(60.0, 12.0)));
        assert!(!area.contains(GeoPoint::new(40.0, 51.0)));
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -179.9).is_valid());
        assert!(!GeoPoint::new(0.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_extent_from_corners() {
        let extent =
            Extent::from_corners(PlanarPoint::new(-10.0, 20.0), PlanarPoint::new(30.0, -5.0));
        assert_eq!(extent.width(), 40.0);
        assert_eq!(extent.height(), 25.0);
        assert!(extent.contains(PlanarPoint::new(0.0, 0.0)));
        assert!(extent.contains(PlanarPoint::new(30.0, 20.0)));
        assert!(!extent.contains(PlanarPoint::new(31.0, 0.0)));
    }

    #[test]
    fn test_planar_point_dvec2_conversion() {
        let p = PlanarPoint::new(1.5, -2.5);
        let v: DVec2 = p.into();
        assert_eq!(v, DVec2::new(1.5, -2.5));
        assert_eq!(PlanarPoint::from(v), p);
    }
}
