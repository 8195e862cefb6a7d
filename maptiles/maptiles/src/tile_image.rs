//! Decoded tile rasters.

use image::RgbaImage;
use maptiles_geo::TileKey;

/// An immutable RGBA raster belonging to exactly one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileImage {
    key: TileKey,
    pixels: RgbaImage,
}

impl TileImage {
    #[must_use]
    pub fn new(key: TileKey, pixels: RgbaImage) -> Self {
        Self { key, pixels }
    }

    /// Decode PNG or JPEG bytes into an RGBA raster.
    pub fn decode(key: TileKey, bytes: &[u8]) -> image::ImageResult<Self> {
        let pixels = image::load_from_memory(bytes)?.into_rgba8();
        Ok(Self::new(key, pixels))
    }

    #[must_use]
    pub fn key(&self) -> TileKey {
        self.key
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Channels per pixel. Tiles are always stored as RGBA.
    #[must_use]
    pub fn channels(&self) -> u8 {
        4
    }

    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Size of the pixel buffer in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.pixels.as_raw().len()
    }
}
