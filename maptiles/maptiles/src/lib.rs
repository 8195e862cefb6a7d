//! Fetch, cache and draw slippy-map tiles covering a geographic area.
//!
//! An [`AreaRenderer`] turns a bounding box and zoom level into the set of
//! covering tiles, fetches each one at most once through its [`TileCache`],
//! and draws them onto a [`Surface`] in Web Mercator coordinates. Points
//! projected with [`project`] land in the same frame, so markers line up
//! with the tiles.
//!
//! # Design principles
//!
//! - **Blocking and single-threaded**: tiles are fetched one at a time
//! - **Owned state**: each renderer owns its cache; nothing is global
//! - **Pluggable edges**: fetching and drawing sit behind traits
//!
//! # Example
//!
//! ```ignore
//! use maptiles::{AreaRenderer, BoundingBox, GeoPoint, MapConfig, RasterSurface, TemplateFetcher, UrlTemplate};
//!
//! let config = MapConfig::default();
//! let template = UrlTemplate::mapbox(&config.map_style_id, "pk...")?;
//! let fetcher = TemplateFetcher::new(template, &config)?;
//! let mut renderer = AreaRenderer::new(RasterSurface::new(1024, 768), fetcher, &config)?;
//!
//! let europe = BoundingBox::new(GeoPoint::new(55.0, -10.0), GeoPoint::new(30.0, 50.0));
//! renderer.render_area(&europe, 4)?;
//! renderer.surface().save("europe.png")?;
//! ```

pub mod cache;
pub mod config;
mod error;
pub mod fetch;
mod renderer;
pub mod surface;
pub mod template;
mod tile_image;

pub use cache::{CacheStats, TileCache};
pub use config::MapConfig;
pub use error::{Error, FetchError, Result};
pub use fetch::{FileTileFetcher, HttpTileFetcher, TemplateFetcher, TileFetcher};
pub use renderer::{AreaRenderer, RenderSummary};
pub use surface::{
    Axis, MarkerShape, MarkerStyle, RasterSurface, RecordingSurface, Surface, SurfaceCall,
};
pub use template::UrlTemplate;
pub use tile_image::TileImage;

// Re-export the coordinate layer for convenience.
pub use maptiles_geo::{
    BoundingBox, Extent, GeoError, GeoPoint, MAX_ZOOM, PlanarPoint, TileKey, TileRange,
};

/// Project a geographic point into the planar frame tiles are drawn in.
pub fn project(point: GeoPoint) -> Result<PlanarPoint> {
    Ok(maptiles_geo::to_planar(point)?)
}
