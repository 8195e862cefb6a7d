//! Tile locator templates.
//!
//! A template is a URL or filesystem path containing `{z}`, `{x}` and `{y}`
//! placeholders. Credentials are baked into the template at construction and
//! never handled separately; [`redact`] masks them in anything that gets
//! logged or reported.

use std::borrow::Cow;
use std::fmt;

use maptiles_geo::TileKey;

use crate::error::{Error, Result};

/// Base URL for Mapbox raster tiles.
const MAPBOX_BASE_URL: &str = "https://api.tiles.mapbox.com/v4";

/// Query parameters whose values are masked by [`redact`].
const SECRET_PARAMS: [&str; 3] = ["access_token=", "api_key=", "key="];

/// Placeholders every template must contain.
const PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// A locator template with `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Parse a template, requiring all three placeholders.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if let Some(missing) = PLACEHOLDERS.iter().find(|p| !template.contains(**p)) {
            return Err(Error::InvalidTemplate {
                template: redact(&template).into_owned(),
                detail: format!("missing {missing} placeholder"),
            });
        }
        Ok(Self { template })
    }

    /// Mapbox raster tiles (512 px, `@2x`) for a style such as `streets`.
    ///
    /// Styles without a namespace are looked up under `mapbox.`.
    pub fn mapbox(style_id: &str, access_token: &str) -> Result<Self> {
        if style_id.is_empty() {
            return Err(Error::Config {
                detail: "map style id must not be empty".to_string(),
            });
        }
        let map_id = if style_id.contains('.') {
            style_id.to_string()
        } else {
            format!("mapbox.{style_id}")
        };
        Self::new(format!(
            "{MAPBOX_BASE_URL}/{map_id}/{{z}}/{{x}}/{{y}}@2x.png?access_token={access_token}"
        ))
    }

    /// Substitute the key's coordinates into the template.
    #[must_use]
    pub fn expand(&self, key: TileKey) -> String {
        self.template
            .replace("{z}", &key.zoom.to_string())
            .replace("{x}", &key.x.to_string())
            .replace("{y}", &key.y.to_string())
    }

    /// Whether the template should be fetched over HTTP.
    #[must_use]
    pub fn is_http(&self) -> bool {
        self.template.starts_with("http://") || self.template.starts_with("https://")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Displays the template with credentials masked.
impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(&self.template))
    }
}

/// Mask the values of credential query parameters in a locator.
#[must_use]
pub fn redact(locator: &str) -> Cow<'_, str> {
    let Some((base, query)) = locator.split_once('?') else {
        return Cow::Borrowed(locator);
    };
    if !SECRET_PARAMS.iter().any(|p| query.contains(p)) {
        return Cow::Borrowed(locator);
    }

    let query = query
        .split('&')
        .map(|pair| match SECRET_PARAMS.iter().find(|p| pair.starts_with(**p)) {
            Some(param) => format!("{param}***"),
            None => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    Cow::Owned(format!("{base}?{query}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_substitutes_all_placeholders() {
        let template = UrlTemplate::new("https://tiles.example/{z}/{x}/{y}.png").unwrap();
        assert_eq!(
            template.expand(TileKey::new(4, 8, 5)),
            "https://tiles.example/4/8/5.png"
        );
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let result = UrlTemplate::new("https://tiles.example/{z}/{x}.png");
        match result {
            Err(Error::InvalidTemplate { detail, .. }) => assert!(detail.contains("{y}")),
            other => panic!("expected InvalidTemplate, got {other:?}"),
        }
    }

    #[test]
    fn test_mapbox_template() {
        let template = UrlTemplate::mapbox("streets", "pk.secret").unwrap();
        assert_eq!(
            template.expand(TileKey::new(4, 8, 5)),
            "https://api.tiles.mapbox.com/v4/mapbox.streets/4/8/5@2x.png?access_token=pk.secret"
        );
        assert!(template.is_http());

        let namespaced = UrlTemplate::mapbox("acme.terrain", "pk").unwrap();
        assert!(namespaced.as_str().contains("/acme.terrain/"));

        assert!(UrlTemplate::mapbox("", "pk").is_err());
    }

    #[test]
    fn test_display_hides_the_token() {
        let template = UrlTemplate::mapbox("streets", "pk.secret").unwrap();
        let shown = template.to_string();
        assert!(!shown.contains("pk.secret"));
        assert!(shown.ends_with("access_token=***"));
    }

    #[test]
    fn test_redact_keeps_other_parameters() {
        assert_eq!(
            redact("https://t.example/1/2/3.png?style=dark&key=abc"),
            "https://t.example/1/2/3.png?style=dark&key=***"
        );
        assert_eq!(redact("/srv/tiles/1/2/3.png"), "/srv/tiles/1/2/3.png");
        assert_eq!(
            redact("https://t.example/1/2/3.png?style=dark"),
            "https://t.example/1/2/3.png?style=dark"
        );
    }

    #[test]
    fn test_filesystem_template_is_not_http() {
        let template = UrlTemplate::new("/srv/tiles/{z}/{x}/{y}.png").unwrap();
        assert!(!template.is_http());
    }
}
