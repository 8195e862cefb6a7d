//! In-memory tile cache.
//!
//! The cache owns its fetcher and a `TileKey → TileImage` map. Each key is
//! fetched at most once successfully; failures are returned to the caller
//! and not remembered, so a later lookup tries again. Entries live as long
//! as the cache and are never evicted.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use maptiles_geo::TileKey;

use crate::error::{Error, Result};
use crate::fetch::TileFetcher;
use crate::tile_image::TileImage;

/// Lookup counters for a [`TileCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that went to the fetcher, successful or not.
    pub misses: u64,
    /// Tiles currently stored.
    pub entries: usize,
}

/// A per-session tile cache in front of a [`TileFetcher`].
#[derive(Debug)]
pub struct TileCache<F> {
    fetcher: F,
    entries: HashMap<TileKey, TileImage>,
    hits: u64,
    misses: u64,
}

impl<F: TileFetcher> TileCache<F> {
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the image for `key`, fetching it on first use.
    pub fn get(&mut self, key: TileKey) -> Result<&TileImage> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                tracing::debug!(%key, "tile cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                tracing::debug!(%key, "tile cache miss");
                let image = self
                    .fetcher
                    .fetch(key)
                    .map_err(|source| Error::TileFetch { key, source })?;
                Ok(entry.insert(image))
            }
        }
    }

    /// Whether `key` is already stored.
    #[must_use]
    pub fn contains(&self, key: &TileKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total pixel bytes held.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.entries.values().map(TileImage::size_bytes).sum()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
