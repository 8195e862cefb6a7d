//! Web Mercator projection and slippy-map tile index math.
//!
//! This crate provides the pure coordinate layer used to turn a geographic
//! area into a set of map tiles and to place those tiles on a planar
//! drawing surface. Nothing here performs I/O.
//!
//! # Design principles
//!
//! - **Stateless**: every operation is a free function over `Copy` values
//! - **No hidden clamping**: tile indices outside the grid are reported as-is
//! - **One projection**: spherical Web Mercator (EPSG:3857) only

mod error;
pub mod projection;
pub mod tile;
mod types;

pub use error::{GeoError, GeoResult};
pub use projection::{EARTH_RADIUS, HALF_CIRCUMFERENCE, MAX_LATITUDE, to_geo, to_planar};
pub use tile::{
    MAX_ZOOM, TileKey, TileRange, TileRangeIter, point_for_tile, tile_bounds, tile_extent,
    tile_for_point,
};
pub use types::{BoundingBox, Extent, GeoPoint, PlanarPoint};
