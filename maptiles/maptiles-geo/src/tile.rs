//! Slippy-map tile indexing.
//!
//! At zoom `z` the projected world is cut into `2^z × 2^z` square tiles.
//! Column `x` grows eastward from the antimeridian and row `y` grows
//! southward from the top of the square world.

use std::f64::consts::PI;
use std::fmt;

use crate::error::GeoResult;
use crate::projection::to_planar;
use crate::types::{Extent, GeoPoint};

/// Largest zoom whose tile indices fit in an `i32`.
pub const MAX_ZOOM: u8 = 30;

/// Fractional tile coordinates this close to an integer, scaled by the
/// number of tiles per axis, are treated as lying exactly on the boundary.
/// The scale keeps the tolerance at roughly 40 µm on the ground at any zoom.
const SNAP_EPSILON: f64 = 1e-12;

/// Identity of one tile in the pyramid.
///
/// Indices are signed so that the unclamped output of [`tile_for_point`]
/// near the poles stays representable; see [`TileKey::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Zoom level.
    pub zoom: u8,
    /// Column, 0 at the antimeridian, increasing eastward.
    pub x: i32,
    /// Row, 0 at the top, increasing southward.
    pub y: i32,
}

impl TileKey {
    #[must_use]
    pub const fn new(zoom: u8, x: i32, y: i32) -> Self {
        Self { zoom, x, y }
    }

    /// Whether the key addresses a tile that exists: `0 <= x, y < 2^zoom`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.zoom > MAX_ZOOM || self.x < 0 || self.y < 0 {
            return false;
        }
        let n = 1_i64 << self.zoom;
        i64::from(self.x) < n && i64::from(self.y) < n
    }

    /// The nearest key inside the grid.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let last = last_index(self.zoom);
        Self::new(self.zoom, self.x.clamp(0, last), self.y.clamp(0, last))
    }

    /// The diagonal neighbour whose north-west corner is this tile's
    /// south-east corner.
    #[must_use]
    pub fn south_east_neighbour(&self) -> Self {
        Self::new(self.zoom, self.x.saturating_add(1), self.y.saturating_add(1))
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`.
fn tile_count(zoom: u8) -> f64 {
    f64::from(zoom).exp2()
}

#[allow(clippy::cast_possible_truncation)]
fn last_index(zoom: u8) -> i32 {
    ((1_i64 << zoom.min(MAX_ZOOM)) - 1) as i32
}

/// Floor a fractional tile coordinate, snapping values that are within
/// rounding noise of a tile boundary onto it.
///
/// Values just below the far edge `n` are never snapped up onto it, so a
/// point inside the grid always lands on a tile inside the grid.
#[allow(clippy::cast_possible_truncation)]
fn snap_floor(value: f64, n: f64) -> i32 {
    let nearest = value.round();
    let near_boundary = (value - nearest).abs() <= n * SNAP_EPSILON;
    let index = if near_boundary && (nearest <= value || nearest < n) {
        nearest
    } else {
        value.floor()
    };
    // Saturates outside the i32 range; NaN becomes 0.
    index as i32
}

/// The tile containing `point` at `zoom`.
///
/// No clamping is applied: longitude 180 yields `x == 2^zoom`, and
/// latitudes beyond the square-world limit yield rows outside the grid.
#[must_use]
pub fn tile_for_point(point: GeoPoint, zoom: u8) -> TileKey {
    let n = tile_count(zoom);
    let lat_rad = point.lat.to_radians();

    let x = (point.lon + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    TileKey::new(zoom, snap_floor(x, n), snap_floor(y, n))
}

/// The north-west corner of `key`.
///
/// Keys one past the last row or column are accepted, so the south-east
/// corner of any tile is `point_for_tile(key.south_east_neighbour())`.
#[must_use]
pub fn point_for_tile(key: TileKey) -> GeoPoint {
    let n = tile_count(key.zoom);
    let lon = f64::from(key.x) / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * f64::from(key.y) / n))
        .sinh()
        .atan()
        .to_degrees();
    GeoPoint::new(lat, lon)
}

/// North-west and south-east corners of `key`.
#[must_use]
pub fn tile_bounds(key: TileKey) -> (GeoPoint, GeoPoint) {
    (
        point_for_tile(key),
        point_for_tile(key.south_east_neighbour()),
    )
}

/// Projected extent covered by `key`.
pub fn tile_extent(key: TileKey) -> GeoResult<Extent> {
    let (nw, se) = tile_bounds(key);
    Ok(Extent::from_corners(to_planar(nw)?, to_planar(se)?))
}

/// Inclusive rectangle of tiles at one zoom level.
///
/// The range is empty when `start` lies east of or below `end`. The zoom of
/// `start` is used for every key the range yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRange {
    start: TileKey,
    end: TileKey,
}

impl TileRange {
    #[must_use]
    pub const fn new(start: TileKey, end: TileKey) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> TileKey {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> TileKey {
        self.end
    }

    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.start.zoom
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.x > self.end.x || self.start.y > self.end.y
    }

    /// Number of columns, zero when empty.
    #[must_use]
    pub fn columns(&self) -> u64 {
        span(self.start.x, self.end.x)
    }

    /// Number of rows, zero when empty.
    #[must_use]
    pub fn rows(&self) -> u64 {
        span(self.start.y, self.end.y)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.columns() * self.rows()).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn contains(&self, key: TileKey) -> bool {
        key.zoom == self.zoom()
            && (self.start.x..=self.end.x).contains(&key.x)
            && (self.start.y..=self.end.y).contains(&key.y)
    }

    /// The same range with both corners pulled inside the grid.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self::new(self.start.clamped(), self.end.clamped())
    }

    /// Geographic north-west and south-east corners covered by the range.
    #[must_use]
    pub fn geo_bounds(&self) -> (GeoPoint, GeoPoint) {
        (
            point_for_tile(self.start),
            point_for_tile(self.end.south_east_neighbour()),
        )
    }

    /// Iterate the keys column by column: `x` outer, `y` inner.
    #[must_use]
    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            next: (!self.is_empty()).then_some((self.start.x, self.start.y)),
        }
    }
}

fn span(start: i32, end: i32) -> u64 {
    u64::try_from(i64::from(end) - i64::from(start) + 1).unwrap_or(0)
}

impl IntoIterator for TileRange {
    type Item = TileKey;
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &TileRange {
    type Item = TileKey;
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the keys of a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    next: Option<(i32, i32)>,
}

impl TileRangeIter {
    fn remaining(&self) -> u64 {
        let Some((x, y)) = self.next else {
            return 0;
        };
        let TileRange { end, .. } = self.range;
        span(x, end.x).saturating_sub(1) * self.range.rows() + span(y, end.y)
    }
}

impl Iterator for TileRangeIter {
    type Item = TileKey;

    fn next(&mut self) -> Option<Self::Item> {
        let (x, y) = self.next?;
        let TileRange { start, end } = self.range;

        self.next = if y < end.y {
            Some((x, y + 1))
        } else if x < end.x {
            Some((x + 1, start.y))
        } else {
            None
        };

        Some(TileKey::new(start.zoom, x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRangeIter {}
