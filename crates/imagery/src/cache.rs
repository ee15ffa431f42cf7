//! Keyed cache of mosaic pairs.

use std::collections::HashMap;

use buildwatch_core::{AreaOfInterest, Date, ImageryConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ImageryProvider, MosaicHandle, MosaicRequest, Result};

/// Cache key: both dates plus the exact area of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    start: Date,
    current: Date,
    lat_bits: u64,
    lon_bits: u64,
    radius_bits: u64,
}

impl PairKey {
    /// Key for the pair `(start, current)` over `aoi`.
    pub fn new(start: Date, current: Date, aoi: &AreaOfInterest) -> Self {
        Self {
            start,
            current,
            lat_bits: aoi.center.lat.to_bits(),
            lon_bits: aoi.center.lon.to_bits(),
            radius_bits: aoi.radius_km.to_bits(),
        }
    }
}

/// The "before" and "after" mosaics shown side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicPair {
    /// Mosaic at the start date
    pub before: MosaicHandle,

    /// Mosaic at the current date
    pub after: MosaicHandle,
}

/// Process-lifetime cache of mosaic pairs.
///
/// The key space is a handful of fixed dates and one area, so entries are
/// never evicted. Failed fetches are not stored.
#[derive(Debug, Default)]
pub struct MosaicCache {
    entries: HashMap<PairKey, MosaicPair>,
    hits: u64,
    misses: u64,
}

impl MosaicCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached pair for the key, fetching both mosaics on a miss.
    pub async fn get_or_fetch(
        &mut self,
        provider: &dyn ImageryProvider,
        start: Date,
        current: Date,
        aoi: &AreaOfInterest,
        imagery: &ImageryConfig,
    ) -> Result<MosaicPair> {
        let key = PairKey::new(start, current, aoi);
        if let Some(pair) = self.entries.get(&key) {
            self.hits += 1;
            debug!("Mosaic cache hit for {}..{}", start, current);
            return Ok(pair.clone());
        }

        self.misses += 1;
        debug!(
            "Mosaic cache miss for {}..{}, fetching from {}",
            start,
            current,
            provider.name()
        );

        let before = provider
            .get_mosaic(&MosaicRequest::for_date("T0", start, aoi, imagery)?)
            .await?;
        let after = provider
            .get_mosaic(&MosaicRequest::for_date("T1", current, aoi, imagery)?)
            .await?;

        let pair = MosaicPair { before, after };
        self.entries.insert(key, pair.clone());
        Ok(pair)
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
