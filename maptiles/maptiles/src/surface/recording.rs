//! A surface that records calls instead of drawing.

use maptiles_geo::{Extent, PlanarPoint, TileKey};

use super::{Axis, MarkerStyle, Surface};
use crate::tile_image::TileImage;

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    DrawImage { key: TileKey, extent: Extent },
    DrawMarker { point: PlanarPoint, style: MarkerStyle },
    SetTicks {
        axis: Axis,
        positions: Vec<f64>,
        labels: Vec<String>,
    },
    SetAxisLabel { axis: Axis, label: String },
    SetVisibleRange { axis: Axis, min: f64, max: f64 },
    SetAspectEqual,
}

/// Keeps every call in order. Useful for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Keys of drawn images, in draw order.
    #[must_use]
    pub fn drawn_tiles(&self) -> Vec<TileKey> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::DrawImage { key, .. } => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Positions of drawn markers, in draw order.
    #[must_use]
    pub fn markers(&self) -> Vec<PlanarPoint> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::DrawMarker { point, .. } => Some(*point),
                _ => None,
            })
            .collect()
    }

    /// The most recent visible range set for `axis`.
    #[must_use]
    pub fn visible_range(&self, axis: Axis) -> Option<(f64, f64)> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::SetVisibleRange { axis: a, min, max } if *a == axis => Some((*min, *max)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn draw_image(&mut self, image: &TileImage, extent: Extent) {
        self.calls.push(SurfaceCall::DrawImage {
            key: image.key(),
            extent,
        });
    }

    fn draw_marker(&mut self, point: PlanarPoint, style: &MarkerStyle) {
        self.calls.push(SurfaceCall::DrawMarker {
            point,
            style: *style,
        });
    }

    fn set_ticks(&mut self, axis: Axis, positions: &[f64], labels: &[String]) {
        self.calls.push(SurfaceCall::SetTicks {
            axis,
            positions: positions.to_vec(),
            labels: labels.to_vec(),
        });
    }

    fn set_axis_label(&mut self, axis: Axis, label: &str) {
        self.calls.push(SurfaceCall::SetAxisLabel {
            axis,
            label: label.to_string(),
        });
    }

    fn set_visible_range(&mut self, axis: Axis, min: f64, max: f64) {
        self.calls.push(SurfaceCall::SetVisibleRange { axis, min, max });
    }

    fn set_aspect_equal(&mut self) {
        self.calls.push(SurfaceCall::SetAspectEqual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new();
        let key = TileKey::new(1, 0, 1);
        let extent = Extent::from_corners(PlanarPoint::new(0.0, 1.0), PlanarPoint::new(1.0, 0.0));

        surface.set_aspect_equal();
        surface.draw_image(&TileImage::new(key, RgbaImage::new(1, 1)), extent);
        surface.draw_marker(PlanarPoint::new(0.5, 0.5), &MarkerStyle::CORNER);

        assert_eq!(surface.calls().len(), 3);
        assert_eq!(surface.calls()[0], SurfaceCall::SetAspectEqual);
        assert_eq!(surface.drawn_tiles(), vec![key]);
        assert_eq!(surface.markers(), vec![PlanarPoint::new(0.5, 0.5)]);

        surface.clear();
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_visible_range_reports_latest() {
        let mut surface = RecordingSurface::new();
        surface.set_visible_range(Axis::X, 0.0, 1.0);
        surface.set_visible_range(Axis::Y, -2.0, 2.0);
        surface.set_visible_range(Axis::X, 5.0, 6.0);

        assert_eq!(surface.visible_range(Axis::X), Some((5.0, 6.0)));
        assert_eq!(surface.visible_range(Axis::Y), Some((-2.0, 2.0)));
    }

    #[test]
    fn test_forwarding_through_mutable_reference() {
        let mut surface = RecordingSurface::new();
        {
            let mut borrowed = &mut surface;
            Surface::set_axis_label(&mut borrowed, Axis::X, "Longitude");
        }
        assert_eq!(
            surface.calls(),
            &[SurfaceCall::SetAxisLabel {
                axis: Axis::X,
                label: "Longitude".to_string()
            }]
        );
    }
}
