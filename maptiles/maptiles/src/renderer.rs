//! Area rendering.
//!
//! [`AreaRenderer`] ties the pieces together: it resolves a bounding box to
//! a [`TileRange`], pulls each tile through its [`TileCache`], and draws the
//! tiles onto a [`Surface`] at their projected extents.

use maptiles_geo::{
    BoundingBox, GeoPoint, MAX_ZOOM, PlanarPoint, TileKey, TileRange, tile_extent, tile_for_point,
    to_planar,
};

use crate::cache::TileCache;
use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::fetch::TileFetcher;
use crate::surface::{Axis, MarkerStyle, Surface};

/// Degree span covered by longitude ticks.
const LONGITUDE_TICKS: (f64, f64) = (-180.0, 180.0);
/// Degree span covered by latitude ticks.
const LATITUDE_TICKS: (f64, f64) = (-90.0, 90.0);

/// What a single render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// The tile range that was drawn.
    pub range: TileRange,
    /// Tiles drawn onto the surface.
    pub tiles_drawn: usize,
    /// Tiles that were already in the cache.
    pub cache_hits: usize,
    /// Tiles fetched during this call.
    pub fetched: usize,
}

impl RenderSummary {
    fn new(range: TileRange) -> Self {
        Self {
            range,
            tiles_drawn: 0,
            cache_hits: 0,
            fetched: 0,
        }
    }
}

/// Renders geographic areas from map tiles onto a surface.
///
/// Each renderer owns its tile cache, so tiles fetched by one render are
/// reused by later renders of the same renderer.
#[derive(Debug)]
pub struct AreaRenderer<F, S> {
    cache: TileCache<F>,
    surface: S,
    strict_bounds: bool,
}

impl<F: TileFetcher, S: Surface> AreaRenderer<F, S> {
    /// Create a renderer and prepare the surface: equal aspect, graticule
    /// ticks and axis labels.
    pub fn new(mut surface: S, fetcher: F, config: &MapConfig) -> Result<Self> {
        config.validate()?;

        surface.set_aspect_equal();
        install_ticks(&mut surface, Axis::X, LONGITUDE_TICKS, config.lng_tick_step);
        install_ticks(&mut surface, Axis::Y, LATITUDE_TICKS, config.lat_tick_step);
        surface.set_axis_label(Axis::X, "Longitude");
        surface.set_axis_label(Axis::Y, "Latitude");

        Ok(Self {
            cache: TileCache::new(fetcher),
            surface,
            strict_bounds: config.strict_bounds,
        })
    }

    /// Draw every tile covering `area` at `zoom`, then frame the view on the
    /// area and mark its corners.
    ///
    /// Both corners are projected before anything is fetched, so a box
    /// touching a pole fails without side effects. The first failing tile
    /// aborts the render; tiles already drawn stay on the surface.
    pub fn render_area(&mut self, area: &BoundingBox, zoom: u8) -> Result<RenderSummary> {
        if zoom > MAX_ZOOM {
            return Err(Error::InvalidZoom(zoom));
        }

        let north_west = area.north_west();
        let south_east = area.south_east();
        let nw = to_planar(north_west)?;
        let se = to_planar(south_east)?;

        let range = TileRange::new(
            tile_for_point(north_west, zoom),
            tile_for_point(south_east, zoom),
        );
        tracing::info!(
            %north_west,
            %south_east,
            zoom,
            tiles = range.len(),
            "rendering area"
        );

        let summary = self.render_range(range)?;

        self.surface.set_visible_range(Axis::X, nw.x, se.x);
        self.surface.set_visible_range(Axis::Y, se.y, nw.y);
        self.surface.draw_marker(nw, &MarkerStyle::CORNER);
        self.surface.draw_marker(se, &MarkerStyle::CORNER);

        Ok(summary)
    }

    /// Draw every tile in `range`, column by column.
    ///
    /// An empty range draws nothing; it is an error only when the renderer
    /// was configured with `strict_bounds`.
    pub fn render_range(&mut self, range: TileRange) -> Result<RenderSummary> {
        if range.zoom() > MAX_ZOOM {
            return Err(Error::InvalidZoom(range.zoom()));
        }
        if range.is_empty() {
            if self.strict_bounds {
                return Err(Error::InvalidBoundingBox { range });
            }
            tracing::warn!(
                start = %range.start(),
                end = %range.end(),
                "empty tile range, nothing drawn"
            );
            return Ok(RenderSummary::new(range));
        }

        let mut summary = RenderSummary::new(range);
        for key in range {
            self.draw_tile(key, &mut summary)?;
        }

        let stats = self.cache.stats();
        tracing::debug!(
            drawn = summary.tiles_drawn,
            fetched = summary.fetched,
            hits = summary.cache_hits,
            cached = stats.entries,
            "rendered tile range"
        );
        Ok(summary)
    }

    fn draw_tile(&mut self, key: TileKey, summary: &mut RenderSummary) -> Result<()> {
        if self.cache.contains(&key) {
            summary.cache_hits += 1;
        } else {
            summary.fetched += 1;
        }

        let image = self.cache.get(key)?;
        let extent = tile_extent(key)?;
        self.surface.draw_image(image, extent);
        summary.tiles_drawn += 1;
        Ok(())
    }

    /// Project `point` into the frame tiles are drawn in.
    pub fn project(&self, point: GeoPoint) -> Result<PlanarPoint> {
        Ok(to_planar(point)?)
    }

    /// Draw a marker at `point` and return its planar position.
    pub fn plot_point(&mut self, point: GeoPoint, style: MarkerStyle) -> Result<PlanarPoint> {
        let planar = self.project(point)?;
        self.surface.draw_marker(planar, &style);
        Ok(planar)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn cache(&self) -> &TileCache<F> {
        &self.cache
    }
}

/// Tick values from `span.0` up to but excluding `span.1`.
fn tick_values(span: (f64, f64), step: f64) -> impl Iterator<Item = f64> {
    (0_u32..)
        .map(move |i| span.0 + f64::from(i) * step)
        .take_while(move |value| *value < span.1)
}

/// Set degree-labelled ticks on `axis`, skipping values with no projection.
fn install_ticks<S: Surface>(surface: &mut S, axis: Axis, span: (f64, f64), step: f64) {
    let (positions, labels): (Vec<f64>, Vec<String>) = tick_values(span, step)
        .filter_map(|degrees| {
            let point = match axis {
                Axis::X => GeoPoint::new(0.0, degrees),
                Axis::Y => GeoPoint::new(degrees, 0.0),
            };
            let planar = to_planar(point).ok()?;
            let position = match axis {
                Axis::X => planar.x,
                Axis::Y => planar.y,
            };
            Some((position, format!("{degrees}°")))
        })
        .unzip();
    surface.set_ticks(axis, &positions, &labels);
}
