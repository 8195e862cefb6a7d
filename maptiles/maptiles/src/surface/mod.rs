//! Drawing surfaces.
//!
//! The renderer draws through the [`Surface`] trait in planar (projected)
//! coordinates. Two implementations are provided:
//!
//! - [`RecordingSurface`]: keeps a log of every call
//! - [`RasterSurface`]: composites tiles and markers into an RGBA image

mod raster;
mod recording;

pub use raster::RasterSurface;
pub use recording::{RecordingSurface, SurfaceCall};

use maptiles_geo::{Extent, PlanarPoint};

use crate::tile_image::TileImage;

/// Plot axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Thin cross.
    Plus,
    /// Filled disc.
    Circle,
}

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Marker diameter in output pixels.
    pub size: f32,
    /// RGBA colour.
    pub color: [u8; 4],
}

impl MarkerStyle {
    /// Black cross used to mark the corners of a rendered area.
    pub const CORNER: Self = Self::new(MarkerShape::Plus, 10.0, [0, 0, 0, 255]);

    /// Red dot for points of interest.
    pub const POINT: Self = Self::new(MarkerShape::Circle, 8.0, [220, 30, 30, 255]);

    #[must_use]
    pub const fn new(shape: MarkerShape, size: f32, color: [u8; 4]) -> Self {
        Self { shape, size, color }
    }
}

/// A 2D drawing context addressed in planar coordinates.
pub trait Surface {
    /// Draw `image` stretched over `extent`.
    fn draw_image(&mut self, image: &TileImage, extent: Extent);

    /// Draw a marker centred on `point`.
    fn draw_marker(&mut self, point: PlanarPoint, style: &MarkerStyle);

    /// Place ticks at `positions` along `axis`, labelled by `labels`.
    fn set_ticks(&mut self, axis: Axis, positions: &[f64], labels: &[String]);

    /// Name an axis.
    fn set_axis_label(&mut self, _axis: Axis, _label: &str) {}

    /// Show `axis` from `min` to `max`. For the y axis `min` is drawn at
    /// the bottom; `min > max` flips the axis.
    fn set_visible_range(&mut self, axis: Axis, min: f64, max: f64);

    /// Use the same scale on both axes.
    fn set_aspect_equal(&mut self);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn draw_image(&mut self, image: &TileImage, extent: Extent) {
        (**self).draw_image(image, extent);
    }

    fn draw_marker(&mut self, point: PlanarPoint, style: &MarkerStyle) {
        (**self).draw_marker(point, style);
    }

    fn set_ticks(&mut self, axis: Axis, positions: &[f64], labels: &[String]) {
        (**self).set_ticks(axis, positions, labels);
    }

    fn set_axis_label(&mut self, axis: Axis, label: &str) {
        (**self).set_axis_label(axis, label);
    }

    fn set_visible_range(&mut self, axis: Axis, min: f64, max: f64) {
        (**self).set_visible_range(axis, min, max);
    }

    fn set_aspect_equal(&mut self) {
        (**self).set_aspect_equal();
    }
}
