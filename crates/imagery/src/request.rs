//! Mosaic requests and handles.

use buildwatch_core::{AreaOfInterest, Date, ImageryConfig, VisParams};
use chrono::Months;
use serde::{Deserialize, Serialize};

use crate::{ImageryError, Result};

/// Per-pixel reducer applied across the filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    /// Median value per pixel
    Median,
}

/// Full description of one cloud-masked composite.
///
/// Images of `collection` acquired in `[date_from, date_to)` over `aoi` have
/// every pixel whose `qa_band` intersects `cloud_mask` dropped, keep `bands`
/// scaled by `scale`, are reduced with `reducer` and clipped to `aoi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicRequest {
    /// Short display label, e.g. "T0"
    pub label: String,

    /// Observation date the mosaic stands for
    pub date: Date,

    /// Source image collection id
    pub collection: String,

    /// First acquisition day (inclusive)
    pub date_from: Date,

    /// Last acquisition day (exclusive)
    pub date_to: Date,

    /// Bounds filter and clip region
    pub aoi: AreaOfInterest,

    /// Buffer around the AOI centre, in metres
    pub buffer_m: f64,

    /// Band carrying the cloud bitmask
    pub qa_band: String,

    /// Bits that must be clear for a pixel to be kept
    pub cloud_mask: u32,

    /// Bands kept in the composite
    pub bands: Vec<String>,

    /// Reflectance scale factor
    pub scale: f64,

    /// Per-pixel reducer
    pub reducer: Reducer,

    /// Visualization range for rendered tiles
    pub vis: VisParams,
}

impl MosaicRequest {
    /// Build the request for the mosaic starting at `date`.
    pub fn for_date(
        label: impl Into<String>,
        date: Date,
        aoi: &AreaOfInterest,
        imagery: &ImageryConfig,
    ) -> Result<Self> {
        let date_to = date
            .checked_add_months(Months::new(imagery.window_months))
            .ok_or_else(|| {
                ImageryError::InvalidRequest(format!(
                    "{} + {} months is out of range",
                    date, imagery.window_months
                ))
            })?;
        let cloud_mask = imagery.cloud_mask().ok_or_else(|| {
            ImageryError::InvalidRequest(format!(
                "cloud mask bits {:?} do not fit in 32 bits",
                imagery.cloud_mask_bits
            ))
        })?;

        Ok(Self {
            label: label.into(),
            date,
            collection: imagery.collection.clone(),
            date_from: date,
            date_to,
            aoi: *aoi,
            buffer_m: aoi.radius_m(),
            qa_band: imagery.qa_band.clone(),
            cloud_mask,
            bands: imagery.bands.clone(),
            scale: imagery.scale,
            reducer: Reducer::Median,
            vis: imagery.vis,
        })
    }
}

/// Opaque reference to a composited mosaic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicHandle {
    /// Provider-assigned id
    pub id: String,

    /// Display label copied from the request
    pub label: String,

    /// Observation date copied from the request
    pub date: Date,

    /// XYZ tile URL template (`{z}/{x}/{y}`), if the provider serves tiles
    pub url_format: Option<String>,

    /// Visualization range the tiles were rendered with
    pub vis: VisParams,
}
