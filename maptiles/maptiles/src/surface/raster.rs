//! Software compositor writing into an RGBA image.

use std::path::Path;

use glam::DVec2;
use image::{Pixel, Rgba, RgbaImage};
use maptiles_geo::{Extent, PlanarPoint};

use super::{Axis, MarkerShape, MarkerStyle, Surface};
use crate::error::{Error, Result};
use crate::tile_image::TileImage;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GRATICULE: Rgba<u8> = Rgba([64, 64, 64, 80]);

/// Maps planar coordinates to output pixels.
///
/// Pixel y grows downwards while planar y grows northwards, so the y axis
/// is inverted on the way out.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    /// Planar coordinate shown at the left/bottom edge of the visible area.
    origin: DVec2,
    /// Signed pixels per planar unit.
    scale: DVec2,
    /// Pixel offset of `origin` from the left/bottom edge of the canvas.
    offset: DVec2,
    height: f64,
}

impl Viewport {
    fn new(x: (f64, f64), y: (f64, f64), size: DVec2, aspect_equal: bool) -> Option<Self> {
        let origin = DVec2::new(x.0, y.0);
        let span = DVec2::new(x.1 - x.0, y.1 - y.0);
        if !span.is_finite() || span.x == 0.0 || span.y == 0.0 {
            return None;
        }

        let (scale, offset) = if aspect_equal {
            let uniform = (size / span.abs()).min_element();
            let offset = (size - span.abs() * uniform) / 2.0;
            (span.signum() * uniform, offset)
        } else {
            (size / span, DVec2::ZERO)
        };

        Some(Self {
            origin,
            scale,
            offset,
            height: size.y,
        })
    }

    fn to_pixel(&self, point: PlanarPoint) -> DVec2 {
        let local = (DVec2::from(point) - self.origin) * self.scale + self.offset;
        DVec2::new(local.x, self.height - local.y)
    }

    fn to_planar(&self, pixel: DVec2) -> PlanarPoint {
        let local = DVec2::new(pixel.x, self.height - pixel.y);
        PlanarPoint::from((local - self.offset) / self.scale + self.origin)
    }
}

/// Composites tiles, graticule lines and markers into an [`RgbaImage`].
///
/// Draw calls are buffered; [`RasterSurface::render`] produces the image
/// once the visible range is known. Without an explicit visible range the
/// bounds of everything drawn are used.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    images: Vec<(TileImage, Extent)>,
    markers: Vec<(PlanarPoint, MarkerStyle)>,
    x_ticks: Vec<f64>,
    y_ticks: Vec<f64>,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_equal: bool,
}

impl RasterSurface {
    /// Create a surface rendering to a `width` × `height` image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            images: Vec::new(),
            markers: Vec::new(),
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            x_range: None,
            y_range: None,
            aspect_equal: false,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of images drawn so far.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Output pixel that `point` lands on, if it is on the canvas.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_for(&self, point: PlanarPoint) -> Option<(u32, u32)> {
        let pixel = self.viewport()?.to_pixel(point).floor();
        let inside = pixel.x >= 0.0
            && pixel.y >= 0.0
            && pixel.x < f64::from(self.width)
            && pixel.y < f64::from(self.height);
        inside.then(|| (pixel.x as u32, pixel.y as u32))
    }

    /// Composite everything drawn so far.
    #[must_use]
    pub fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let Some(viewport) = self.viewport() else {
            return canvas;
        };

        for (image, extent) in &self.images {
            self.composite_tile(&mut canvas, &viewport, image, *extent);
        }
        self.draw_graticule(&mut canvas, &viewport);
        for (point, style) in &self.markers {
            draw_marker(&mut canvas, viewport.to_pixel(*point), style);
        }
        canvas
    }

    /// Render and write the image; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.render().save(path).map_err(|e| Error::Output {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), width = self.width, height = self.height, "wrote map");
        Ok(())
    }

    fn size(&self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.height))
    }

    fn viewport(&self) -> Option<Viewport> {
        let (x, y) = match (self.x_range, self.y_range) {
            (Some(x), Some(y)) => (x, y),
            (x, y) => {
                let (min, max) = self.drawn_bounds()?;
                (x.unwrap_or((min.x, max.x)), y.unwrap_or((min.y, max.y)))
            }
        };
        Viewport::new(x, y, self.size(), self.aspect_equal)
    }

    fn drawn_bounds(&self) -> Option<(DVec2, DVec2)> {
        let corners = self.images.iter().flat_map(|(_, extent)| {
            [
                DVec2::new(extent.min_x, extent.min_y),
                DVec2::new(extent.max_x, extent.max_y),
            ]
        });
        let points = self.markers.iter().map(|(point, _)| DVec2::from(*point));

        corners.chain(points).fold(None, |bounds, p| match bounds {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn composite_tile(
        &self,
        canvas: &mut RgbaImage,
        viewport: &Viewport,
        image: &TileImage,
        extent: Extent,
    ) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let a = viewport.to_pixel(PlanarPoint::new(extent.min_x, extent.max_y));
        let b = viewport.to_pixel(PlanarPoint::new(extent.max_x, extent.min_y));
        let lo = a.min(b).floor().max(DVec2::ZERO);
        let hi = a.max(b).ceil().min(self.size());
        if lo.x >= hi.x || lo.y >= hi.y {
            return;
        }

        let source = image.pixels();
        let (source_w, source_h) = (f64::from(image.width()), f64::from(image.height()));
        for py in lo.y as u32..hi.y as u32 {
            for px in lo.x as u32..hi.x as u32 {
                let centre = DVec2::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let planar = viewport.to_planar(centre);
                if !extent.contains(planar) {
                    continue;
                }
                // Row 0 of a tile is its northern edge.
                let u = (planar.x - extent.min_x) / extent.width();
                let v = (extent.max_y - planar.y) / extent.height();
                let sx = ((u * source_w) as u32).min(image.width() - 1);
                let sy = ((v * source_h) as u32).min(image.height() - 1);
                paint(canvas.get_pixel_mut(px, py), source.get_pixel(sx, sy));
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_graticule(&self, canvas: &mut RgbaImage, viewport: &Viewport) {
        let size = self.size();
        for &x in &self.x_ticks {
            let px = viewport.to_pixel(PlanarPoint::new(x, 0.0)).x.floor();
            if (0.0..size.x).contains(&px) {
                for py in 0..self.height {
                    paint(canvas.get_pixel_mut(px as u32, py), &GRATICULE);
                }
            }
        }
        for &y in &self.y_ticks {
            let py = viewport.to_pixel(PlanarPoint::new(0.0, y)).y.floor();
            if (0.0..size.y).contains(&py) {
                for px in 0..self.width {
                    paint(canvas.get_pixel_mut(px, py as u32), &GRATICULE);
                }
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn draw_marker(canvas: &mut RgbaImage, centre: DVec2, style: &MarkerStyle) {
    let color = Rgba(style.color);
    let radius = (f64::from(style.size) / 2.0).max(0.5);
    let centre = centre.floor();
    let reach = radius.ceil() as i64;
    let (cx, cy) = (centre.x as i64, centre.y as i64);
    let thickness = (radius / 5.0).floor() as i64;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = DVec2::new(dx as f64, dy as f64);
            let hit = match style.shape {
                MarkerShape::Plus => {
                    (dx.abs() <= thickness && d.y.abs() <= radius)
                        || (dy.abs() <= thickness && d.x.abs() <= radius)
                }
                MarkerShape::Circle => d.length() <= radius,
            };
            if hit {
                put_pixel(canvas, cx + dx, cy + dy, &color);
            }
        }
    }
}

fn put_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: &Rgba<u8>) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x < canvas.width() && y < canvas.height() {
        paint(canvas.get_pixel_mut(x, y), color);
    }
}

/// Source-over compositing. Opaque sources replace the destination exactly.
fn paint(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    match src.0[3] {
        0 => {}
        255 => *dst = *src,
        _ => dst.blend(src),
    }
}

impl Surface for RasterSurface {
    fn draw_image(&mut self, image: &TileImage, extent: Extent) {
        self.images.push((image.clone(), extent));
    }

    fn draw_marker(&mut self, point: PlanarPoint, style: &MarkerStyle) {
        self.markers.push((point, *style));
    }

    fn set_ticks(&mut self, axis: Axis, positions: &[f64], _labels: &[String]) {
        match axis {
            Axis::X => self.x_ticks = positions.to_vec(),
            Axis::Y => self.y_ticks = positions.to_vec(),
        }
    }

    fn set_visible_range(&mut self, axis: Axis, min: f64, max: f64) {
        match axis {
            Axis::X => self.x_range = Some((min, max)),
            Axis::Y => self.y_range = Some((min, max)),
        }
    }

    fn set_aspect_equal(&mut self) {
        self.aspect_equal = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maptiles_geo::TileKey;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn solid(key: TileKey, color: [u8; 4]) -> TileImage {
        TileImage::new(key, RgbaImage::from_pixel(4, 4, Rgba(color)))
    }

    fn unit_square(min_x: f64, min_y: f64) -> Extent {
        Extent {
            min_x,
            max_x: min_x + 1.0,
            min_y,
            max_y: min_y + 1.0,
        }
    }

    #[test]
    fn test_viewport_round_trip() {
        let viewport = Viewport::new((0.0, 10.0), (-5.0, 5.0), DVec2::new(100.0, 50.0), true)
            .unwrap();
        // Uniform scale of 5 px per unit; x spans 50 px centred in 100.
        assert_eq!(viewport.to_pixel(PlanarPoint::new(0.0, 5.0)), DVec2::new(25.0, 0.0));
        assert_eq!(viewport.to_pixel(PlanarPoint::new(10.0, -5.0)), DVec2::new(75.0, 50.0));

        let back = viewport.to_planar(DVec2::new(40.0, 10.0));
        assert!((back.x - 3.0).abs() < 1e-12);
        assert!((back.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_has_no_viewport() {
        assert!(Viewport::new((1.0, 1.0), (0.0, 1.0), DVec2::new(10.0, 10.0), false).is_none());
    }

    #[test]
    fn test_empty_surface_renders_background() {
        let image = RasterSurface::new(8, 6).render();
        assert_eq!(image.dimensions(), (8, 6));
        assert!(image.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_tiles_land_north_up() {
        let mut surface = RasterSurface::new(20, 40);
        // Red tile to the north of the blue one.
        surface.draw_image(&solid(TileKey::new(1, 0, 0), RED), unit_square(0.0, 1.0));
        surface.draw_image(&solid(TileKey::new(1, 0, 1), BLUE), unit_square(0.0, 0.0));
        surface.set_visible_range(Axis::X, 0.0, 1.0);
        surface.set_visible_range(Axis::Y, 0.0, 2.0);

        let image = surface.render();
        assert_eq!(*image.get_pixel(10, 5), Rgba(RED));
        assert_eq!(*image.get_pixel(10, 35), Rgba(BLUE));
    }

    #[test]
    fn test_aspect_equal_letterboxes() {
        let mut surface = RasterSurface::new(40, 20);
        surface.set_aspect_equal();
        surface.draw_image(&solid(TileKey::new(0, 0, 0), RED), unit_square(0.0, 0.0));
        surface.set_visible_range(Axis::X, 0.0, 1.0);
        surface.set_visible_range(Axis::Y, 0.0, 1.0);

        let image = surface.render();
        assert_eq!(*image.get_pixel(20, 10), Rgba(RED));
        assert_eq!(*image.get_pixel(2, 10), BACKGROUND);
        assert_eq!(*image.get_pixel(37, 10), BACKGROUND);
    }

    #[test]
    fn test_pixel_for_point() {
        let mut surface = RasterSurface::new(100, 100);
        surface.set_visible_range(Axis::X, 0.0, 100.0);
        surface.set_visible_range(Axis::Y, 0.0, 100.0);

        assert_eq!(surface.pixel_for(PlanarPoint::new(10.5, 89.5)), Some((10, 10)));
        assert_eq!(surface.pixel_for(PlanarPoint::new(-1.0, 50.0)), None);
    }

    #[test]
    fn test_falls_back_to_drawn_bounds() {
        let mut surface = RasterSurface::new(10, 10);
        surface.draw_image(&solid(TileKey::new(0, 0, 0), BLUE), unit_square(3.0, 3.0));

        let image = surface.render();
        assert!(image.pixels().all(|p| *p == Rgba(BLUE)));
    }

    #[test]
    fn test_markers_are_drawn_on_top() {
        let mut surface = RasterSurface::new(21, 21);
        surface.draw_image(&solid(TileKey::new(0, 0, 0), BLUE), unit_square(0.0, 0.0));
        surface.draw_marker(PlanarPoint::new(0.5, 0.5), &MarkerStyle::CORNER);
        surface.set_visible_range(Axis::X, 0.0, 1.0);
        surface.set_visible_range(Axis::Y, 0.0, 1.0);

        let image = surface.render();
        assert_eq!(*image.get_pixel(10, 10), Rgba([0, 0, 0, 255]));
        // Arms of the cross, but not its diagonals.
        assert_eq!(*image.get_pixel(14, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(14, 14), Rgba(BLUE));
    }

    #[test]
    fn test_graticule_lines_follow_ticks() {
        let mut surface = RasterSurface::new(10, 10);
        surface.set_visible_range(Axis::X, 0.0, 10.0);
        surface.set_visible_range(Axis::Y, 0.0, 10.0);
        surface.set_ticks(Axis::X, &[5.5], &["5.5°".to_string()]);

        let image = surface.render();
        assert_ne!(*image.get_pixel(5, 0), BACKGROUND);
        assert_ne!(*image.get_pixel(5, 9), BACKGROUND);
        assert_eq!(*image.get_pixel(4, 4), BACKGROUND);
    }

    #[test]
    fn test_save_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let mut surface = RasterSurface::new(16, 8);
        surface.draw_image(&solid(TileKey::new(0, 0, 0), RED), unit_square(0.0, 0.0));
        surface.save(&path).unwrap();

        let written = image::open(&path).unwrap().into_rgba8();
        assert_eq!(written.dimensions(), (16, 8));
    }

    #[test]
    fn test_save_to_missing_directory_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let surface = RasterSurface::new(4, 4);
        assert!(matches!(
            surface.save(dir.path().join("missing").join("map.png")),
            Err(Error::Output { .. })
        ));
    }
}
