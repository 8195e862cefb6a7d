//! Renderer configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Keys are camelCase:
//!
//! ```json
//! {
//!   "latTickStep": 10,
//!   "lngTickStep": 10,
//!   "resourceLocatorTemplate": "https://tile.example/{z}/{x}/{y}.png",
//!   "mapStyleId": "streets",
//!   "strictBounds": false,
//!   "timeoutSecs": 30
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::template::UrlTemplate;

/// Default spacing of graticule ticks in degrees.
const DEFAULT_TICK_STEP: f64 = 10.0;
/// Default Mapbox style.
const DEFAULT_MAP_STYLE: &str = "streets";
/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Most ticks allowed on one axis.
const MAX_TICKS: f64 = 100_000.0;
/// Degrees covered by latitude ticks.
const LATITUDE_SPAN: f64 = 180.0;
/// Degrees covered by longitude ticks.
const LONGITUDE_SPAN: f64 = 360.0;
/// User agent for tile requests.
const DEFAULT_USER_AGENT: &str = "maptiles/0.1 (https://github.com/philpax/maptiles)";

/// Construction-time options for an [`AreaRenderer`](crate::AreaRenderer)
/// and its fetcher.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MapConfig {
    /// Degrees between latitude ticks.
    pub lat_tick_step: f64,
    /// Degrees between longitude ticks.
    pub lng_tick_step: f64,
    /// Explicit locator template. When absent a Mapbox template is built
    /// from `map_style_id` and an access token.
    pub resource_locator_template: Option<String>,
    /// Mapbox style used when no template is given.
    pub map_style_id: String,
    /// Treat an empty tile range as an error instead of drawing nothing.
    pub strict_bounds: bool,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with HTTP requests.
    pub user_agent: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            lat_tick_step: DEFAULT_TICK_STEP,
            lng_tick_step: DEFAULT_TICK_STEP,
            resource_locator_template: None,
            map_style_id: DEFAULT_MAP_STYLE.to_string(),
            strict_bounds: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MapConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config {
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::Config {
            detail: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, step, span) in [
            ("latTickStep", self.lat_tick_step, LATITUDE_SPAN),
            ("lngTickStep", self.lng_tick_step, LONGITUDE_SPAN),
        ] {
            if !step.is_finite() || step <= 0.0 {
                return Err(Error::Config {
                    detail: format!("{name} must be a positive number of degrees, got {step}"),
                });
            }
            if span / step > MAX_TICKS {
                return Err(Error::Config {
                    detail: format!(
                        "{name} of {step} degrees gives more than {MAX_TICKS} ticks over {span} degrees"
                    ),
                });
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config {
                detail: "timeoutSecs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The locator template to fetch tiles from.
    ///
    /// An explicit template wins; otherwise a Mapbox template is built,
    /// which needs `access_token`.
    pub fn locator_template(&self, access_token: Option<&str>) -> Result<UrlTemplate> {
        if let Some(template) = &self.resource_locator_template {
            return UrlTemplate::new(template.as_str());
        }
        match access_token {
            Some(token) if !token.is_empty() => UrlTemplate::mapbox(&self.map_style_id, token),
            _ => Err(Error::Config {
                detail: "no resource locator template configured and no access token given"
                    .to_string(),
            }),
        }
    }
}
