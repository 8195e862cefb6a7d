//! Tile fetchers.
//!
//! A [`TileFetcher`] turns a [`TileKey`] into a decoded [`TileImage`]. The
//! renderer only ever talks to this trait; the implementations here read
//! from HTTP or from the filesystem via a [`UrlTemplate`].

use std::path::PathBuf;
use std::time::Duration;

use maptiles_geo::TileKey;

use crate::config::MapConfig;
use crate::error::{Error, FetchError, Result};
use crate::template::{UrlTemplate, redact};
use crate::tile_image::TileImage;

/// Source of tile images.
///
/// Calls block until the image is available or the fetch has failed.
pub trait TileFetcher {
    /// Fetch and decode the image for `key`.
    fn fetch(&self, key: TileKey) -> std::result::Result<TileImage, FetchError>;
}

impl<F> TileFetcher for F
where
    F: Fn(TileKey) -> std::result::Result<TileImage, FetchError>,
{
    fn fetch(&self, key: TileKey) -> std::result::Result<TileImage, FetchError> {
        self(key)
    }
}

/// Fetches tiles over HTTP with a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTileFetcher {
    http: reqwest::blocking::Client,
    template: UrlTemplate,
}

impl HttpTileFetcher {
    /// Create a fetcher with the default timeout and user agent.
    pub fn new(template: UrlTemplate) -> Result<Self> {
        Self::with_config(template, &MapConfig::default())
    }

    /// Create a fetcher using the timeout and user agent from `config`.
    pub fn with_config(template: UrlTemplate, config: &MapConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                detail: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { http, template })
    }

    /// Create a fetcher with a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::blocking::Client, template: UrlTemplate) -> Self {
        Self { http, template }
    }

    #[must_use]
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }
}

impl TileFetcher for HttpTileFetcher {
    fn fetch(&self, key: TileKey) -> std::result::Result<TileImage, FetchError> {
        let url = self.template.expand(key);
        let shown = redact(&url).into_owned();
        tracing::debug!(url = %shown, %key, "fetching tile");

        let response = self.http.get(&url).send().map_err(|e| FetchError::Http {
            url: shown.clone(),
            message: e.without_url().to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: shown,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Http {
            url: shown.clone(),
            message: e.without_url().to_string(),
        })?;

        TileImage::decode(key, &bytes).map_err(|e| FetchError::Decode {
            locator: shown,
            message: e.to_string(),
        })
    }
}

/// Reads tiles from a directory tree laid out by a path template.
#[derive(Debug, Clone)]
pub struct FileTileFetcher {
    template: UrlTemplate,
}

impl FileTileFetcher {
    #[must_use]
    pub fn new(template: UrlTemplate) -> Self {
        Self { template }
    }

    #[must_use]
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }
}

impl TileFetcher for FileTileFetcher {
    fn fetch(&self, key: TileKey) -> std::result::Result<TileImage, FetchError> {
        let path = PathBuf::from(self.template.expand(key));
        tracing::debug!(path = %path.display(), %key, "reading tile");

        let bytes = std::fs::read(&path).map_err(|e| FetchError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        TileImage::decode(key, &bytes).map_err(|e| FetchError::Decode {
            locator: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Picks the HTTP or filesystem fetcher based on the template's scheme.
#[derive(Debug, Clone)]
pub enum TemplateFetcher {
    Http(HttpTileFetcher),
    File(FileTileFetcher),
}

impl TemplateFetcher {
    pub fn new(template: UrlTemplate, config: &MapConfig) -> Result<Self> {
        if template.is_http() {
            Ok(Self::Http(HttpTileFetcher::with_config(template, config)?))
        } else {
            Ok(Self::File(FileTileFetcher::new(template)))
        }
    }

    #[must_use]
    pub fn template(&self) -> &UrlTemplate {
        match self {
            Self::Http(fetcher) => fetcher.template(),
            Self::File(fetcher) => fetcher.template(),
        }
    }
}

impl TileFetcher for TemplateFetcher {
    fn fetch(&self, key: TileKey) -> std::result::Result<TileImage, FetchError> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(key),
            Self::File(fetcher) => fetcher.fetch(key),
        }
    }
}
