//! Error types for the maptiles crate.

use std::fmt;
use std::path::PathBuf;

use maptiles_geo::{GeoError, TileKey, TileRange};

/// Result type for maptiles operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single tile could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP request failed.
    Http {
        /// The locator that failed, with credentials redacted.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The locator that returned the error, with credentials redacted.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// Reading a tile from the filesystem failed.
    Io { path: PathBuf, message: String },
    /// The response was not a decodable raster image.
    Decode { locator: String, message: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { url, message } => write!(f, "http request to {url} failed: {message}"),
            Self::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Self::Io { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            Self::Decode { locator, message } => {
                write!(f, "failed to decode image from {locator}: {message}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Errors that can occur while rendering an area.
#[derive(Debug)]
pub enum Error {
    /// A point could not be projected.
    Projection(GeoError),
    /// A tile fetch failed. The failure is not cached.
    TileFetch { key: TileKey, source: FetchError },
    /// The bounding box produced an empty tile range and strict bounds
    /// checking is enabled.
    InvalidBoundingBox { range: TileRange },
    /// Zoom level beyond [`maptiles_geo::MAX_ZOOM`].
    InvalidZoom(u8),
    /// A locator template is missing a placeholder.
    InvalidTemplate { template: String, detail: String },
    /// Configuration could not be loaded or is inconsistent.
    Config { detail: String },
    /// Writing rendered output failed.
    Output { path: PathBuf, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Projection(e) => write!(f, "projection error: {e}"),
            Error::TileFetch { key, source } => write!(f, "failed to fetch tile {key}: {source}"),
            Error::InvalidBoundingBox { range } => write!(
                f,
                "bounding box yields an empty tile range from {} to {}",
                range.start(),
                range.end()
            ),
            Error::InvalidZoom(zoom) => write!(
                f,
                "invalid zoom level {zoom} (must be at most {})",
                maptiles_geo::MAX_ZOOM
            ),
            Error::InvalidTemplate { template, detail } => {
                write!(f, "invalid locator template '{template}': {detail}")
            }
            Error::Config { detail } => write!(f, "invalid configuration: {detail}"),
            Error::Output { path, message } => {
                write!(f, "failed to write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Projection(e) => Some(e),
            Error::TileFetch { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GeoError> for Error {
    fn from(e: GeoError) -> Self {
        Error::Projection(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_tile_fetch_display_includes_key_and_cause() {
        let err = Error::TileFetch {
            key: TileKey::new(4, 8, 5),
            source: FetchError::HttpStatus {
                url: "https://tiles.example/4/8/5.png".to_string(),
                status: 404,
            },
        };
        let message = err.to_string();
        assert!(message.contains("4/8/5"));
        assert!(message.contains("404"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_geo_error_converts() {
        let err: Error = GeoError::ProjectionDomain {
            latitude: 90.0,
            longitude: 0.0,
        }
        .into();
        assert!(matches!(err, Error::Projection(_)));
    }
}
