//! Site model - the fixed place, dates, and imagery recipe being watched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Date, Error, Result};

/// A geographic point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Area of interest: a disc of fixed radius around a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    /// Centre of the disc
    pub center: GeoPoint,

    /// Buffer radius in kilometres
    pub radius_km: f64,
}

impl AreaOfInterest {
    /// Buffer radius in metres.
    pub fn radius_m(&self) -> f64 {
        self.radius_km * 1000.0
    }

    /// Short caption, e.g. "2km buffer around site".
    pub fn caption(&self) -> String {
        format!("{}km buffer around site", self.radius_km)
    }
}

/// Display range for rendered mosaics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    /// Value mapped to black
    pub min: f64,

    /// Value mapped to white
    pub max: f64,
}

impl Default for VisParams {
    fn default() -> Self {
        Self { min: 0.0, max: 0.3 }
    }
}

/// How a mosaic is composited from the source image collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageryConfig {
    /// Source image collection id
    pub collection: String,

    /// Length of the acquisition window starting at each date, in months
    pub window_months: u32,

    /// Band carrying the cloud bitmask
    pub qa_band: String,

    /// Bits of the QA band that flag cloud or cirrus
    pub cloud_mask_bits: Vec<u8>,

    /// Bands kept in the composite, in display order
    pub bands: Vec<String>,

    /// Multiplier applied to raw reflectance values
    pub scale: f64,

    /// Visualization range
    pub vis: VisParams,

    /// Attribution shown with the tiles
    pub attribution: String,

    /// Mosaic service base URL (None = offline placeholder)
    pub endpoint: Option<String>,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            collection: "COPERNICUS/S2_SR_HARMONIZED".to_string(),
            window_months: 1,
            qa_band: "QA60".to_string(),
            cloud_mask_bits: vec![10, 11],
            bands: vec!["B4".to_string(), "B3".to_string(), "B2".to_string()],
            scale: 1.0 / 10000.0,
            vis: VisParams::default(),
            attribution: "Google Earth Engine".to_string(),
            endpoint: None,
        }
    }
}

impl ImageryConfig {
    /// Combined cloud bitmask, e.g. `(1 << 10) | (1 << 11)`.
    ///
    /// Returns `None` if any bit does not fit in 32 bits.
    pub fn cloud_mask(&self) -> Option<u32> {
        self.cloud_mask_bits.iter().try_fold(0u32, |mask, bit| {
            1u32.checked_shl(u32::from(*bit)).map(|flag| mask | flag)
        })
    }
}

/// Deployment configuration for one watched site.
///
/// Every value here is fixed for the lifetime of the process and is passed
/// into the predictor and the imagery provider at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name
    pub name: String,

    /// Dashboard title
    pub title: String,

    /// Free-form description shown under the title
    pub description: String,

    /// Construction start (0% complete)
    pub start_date: Date,

    /// Reference date the user's percent refers to
    pub reference_date: Date,

    /// Area of interest
    pub aoi: AreaOfInterest,

    /// Mosaic recipe
    pub imagery: ImageryConfig,

    /// Percent complete shown before the user picks one
    pub default_percent: u8,

    /// Initial map zoom level
    pub map_zoom: u8,

    /// Basemap tile set name
    pub basemap: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Chacao Bridge".to_string(),
            title: "Chile's Chacao Bridge - Construction Progress".to_string(),
            description: "The Chacao Bridge, in Chile's Los Lagos Region, will connect \
                Chiloé Island to the mainland. Two satellite mosaics taken on different \
                dates show the construction progress; the percent complete at the \
                reference date is extrapolated linearly to estimate the finish date."
                .to_string(),
            start_date: ymd(2019, 1, 19),
            reference_date: ymd(2025, 2, 26),
            aoi: AreaOfInterest {
                center: GeoPoint::new(-41.795582772327116, -73.5238575107115),
                radius_km: 2.0,
            },
            imagery: ImageryConfig::default(),
            default_percent: 50,
            map_zoom: 13,
            basemap: "CartoDB.Positron".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading site config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: SiteConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the predictor and provider rely on.
    pub fn validate(&self) -> Result<()> {
        if self.start_date >= self.reference_date {
            return Err(Error::DateOrder {
                start: self.start_date,
                reference: self.reference_date,
            });
        }

        let center = self.aoi.center;
        if !(-90.0..=90.0).contains(&center.lat) {
            return Err(Error::InvalidConfig(format!(
                "latitude {} out of range",
                center.lat
            )));
        }
        if !(-180.0..=180.0).contains(&center.lon) {
            return Err(Error::InvalidConfig(format!(
                "longitude {} out of range",
                center.lon
            )));
        }
        if !(self.aoi.radius_km > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "AOI radius must be positive, got {}",
                self.aoi.radius_km
            )));
        }

        if self.imagery.window_months == 0 {
            return Err(Error::InvalidConfig(
                "imagery window must be at least one month".to_string(),
            ));
        }
        if self.imagery.vis.min >= self.imagery.vis.max {
            return Err(Error::InvalidConfig(format!(
                "vis range [{}, {}] is empty",
                self.imagery.vis.min, self.imagery.vis.max
            )));
        }
        if self.imagery.cloud_mask().is_none() {
            return Err(Error::InvalidConfig(format!(
                "cloud mask bits {:?} out of range",
                self.imagery.cloud_mask_bits
            )));
        }
        if self.default_percent > 100 {
            return Err(Error::InvalidConfig(format!(
                "default percent {} exceeds 100",
                self.default_percent
            )));
        }

        Ok(())
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Date {
    Date::from_ymd_opt(year, month, day).unwrap_or_default()
}
