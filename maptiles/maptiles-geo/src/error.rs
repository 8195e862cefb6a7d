//! Error types for coordinate operations.

use std::fmt;

/// Errors that can occur while converting coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// The point has no Web Mercator image: latitude at or beyond a pole,
    /// or a non-finite coordinate.
    ProjectionDomain { latitude: f64, longitude: f64 },
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectionDomain {
                latitude,
                longitude,
            } => write!(
                f,
                "cannot project ({latitude}, {longitude}): latitude must be finite and strictly between -90 and 90"
            ),
        }
    }
}

impl std::error::Error for GeoError {}

/// Result type for coordinate operations.
pub type GeoResult<T> = Result<T, GeoError>;
