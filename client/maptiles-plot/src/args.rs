//! Command-line arguments.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, error::ErrorKind};
use maptiles::{BoundingBox, GeoPoint};

/// North-west corner of the default area.
const DEFAULT_NORTH_WEST: GeoPoint = GeoPoint::new(55.0, -10.0);
/// South-east corner of the default area.
const DEFAULT_SOUTH_EAST: GeoPoint = GeoPoint::new(30.0, 50.0);
/// Places marked when no `--marker` is given.
pub const DEFAULT_MARKERS: [(&str, GeoPoint); 3] = [
    ("Berlin", GeoPoint::new(52.51695, 13.38943)),
    ("Rome", GeoPoint::new(41.8988, 12.5451)),
    ("Istanbul", GeoPoint::new(41.0098, 28.9652)),
];

/// Parse a `LAT,LON` pair in degrees.
pub fn parse_lat_lon(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid longitude: {e}"))?;

    let point = GeoPoint::new(lat, lon);
    if !point.is_valid() {
        return Err(format!("coordinate out of range: {point}"));
    }
    Ok(point)
}

#[derive(Parser, Debug)]
#[command(
    name = "maptiles-plot",
    about = "Render a geographic area from slippy-map tiles"
)]
pub struct CliArgs {
    /// Area corner as LAT,LON. Give it twice; defaults to 55,-10 and 30,50.
    #[arg(
        long = "corner",
        value_name = "LAT,LON",
        value_parser = parse_lat_lon,
        allow_hyphen_values = true
    )]
    pub corners: Vec<GeoPoint>,

    /// Zoom level of the tiles.
    #[arg(long, short, default_value_t = 4)]
    pub zoom: u8,

    /// Point to mark as LAT,LON. Repeatable; defaults to Berlin, Rome and Istanbul.
    #[arg(
        long = "marker",
        value_name = "LAT,LON",
        value_parser = parse_lat_lon,
        allow_hyphen_values = true
    )]
    pub markers: Vec<GeoPoint>,

    /// Draw no markers besides the area corners.
    #[arg(long, conflicts_with = "markers")]
    pub no_markers: bool,

    /// Output image; the format follows the extension.
    #[arg(long, short, default_value = "map.png")]
    pub output: PathBuf,

    /// Output width in pixels.
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tile locator template with {z}, {x} and {y}; overrides the config.
    #[arg(long)]
    pub template: Option<String>,

    /// Mapbox style id; overrides the config.
    #[arg(long)]
    pub style: Option<String>,

    /// Mapbox access token.
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// List the tiles that would be drawn without fetching anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Checks clap cannot express declaratively.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if !matches!(self.corners.len(), 0 | 2) {
            return Err(Self::command().error(
                ErrorKind::WrongNumberOfValues,
                format!(
                    "--corner must be given exactly twice, got {}",
                    self.corners.len()
                ),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Self::command().error(
                ErrorKind::InvalidValue,
                "--width and --height must be positive",
            ));
        }
        Ok(())
    }

    pub fn area(&self) -> BoundingBox {
        match self.corners.as_slice() {
            [first, second] => BoundingBox::new(*first, *second),
            _ => BoundingBox::new(DEFAULT_NORTH_WEST, DEFAULT_SOUTH_EAST),
        }
    }

    pub fn markers(&self) -> Vec<GeoPoint> {
        if self.no_markers {
            Vec::new()
        } else if self.markers.is_empty() {
            DEFAULT_MARKERS.iter().map(|(_, point)| *point).collect()
        } else {
            self.markers.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("maptiles-plot").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_lat_lon() {
        assert_eq!(parse_lat_lon("55,-10"), Ok(GeoPoint::new(55.0, -10.0)));
        assert_eq!(
            parse_lat_lon(" 41.8988 , 12.5451 "),
            Ok(GeoPoint::new(41.8988, 12.5451))
        );
        assert!(parse_lat_lon("55").is_err());
        assert!(parse_lat_lon("north,east").is_err());
        assert!(parse_lat_lon("95,0").is_err());
        assert!(parse_lat_lon("0,181").is_err());
    }

    #[test]
    fn test_defaults_reproduce_the_demo() {
        let args = parse(&[]);
        args.validate().unwrap();
        assert_eq!(args.zoom, 4);
        assert_eq!(args.output, PathBuf::from("map.png"));
        assert_eq!(
            args.area(),
            BoundingBox::new(GeoPoint::new(55.0, -10.0), GeoPoint::new(30.0, 50.0))
        );
        assert_eq!(args.markers().len(), 3);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_corners_and_markers_accept_negative_values() {
        let args = parse(&[
            "--corner",
            "-10,-80",
            "--corner",
            "-40,-30",
            "--marker",
            "-22.9,-43.2",
            "--zoom",
            "5",
        ]);
        args.validate().unwrap();
        assert_eq!(
            args.area(),
            BoundingBox::new(GeoPoint::new(-10.0, -80.0), GeoPoint::new(-40.0, -30.0))
        );
        assert_eq!(args.markers(), vec![GeoPoint::new(-22.9, -43.2)]);
        assert_eq!(args.zoom, 5);
    }

    #[test]
    fn test_single_corner_is_rejected() {
        let args = parse(&["--corner", "55,-10"]);
        let err = args.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongNumberOfValues);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let args = parse(&["--width", "0"]);
        assert_eq!(args.validate().unwrap_err().kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_no_markers() {
        assert!(parse(&["--no-markers"]).markers().is_empty());
        assert!(
            CliArgs::try_parse_from(["maptiles-plot", "--no-markers", "--marker", "1,2"]).is_err()
        );
    }

    #[test]
    fn test_bad_coordinate_is_a_parse_error() {
        assert!(CliArgs::try_parse_from(["maptiles-plot", "--corner", "abc"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        CliArgs::command().debug_assert();
    }
}
