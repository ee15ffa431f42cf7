//! The dashboard session.

use buildwatch_core::{Date, GeoPoint, SiteConfig};
use buildwatch_imagery::{ImageryProvider, MosaicCache, MosaicHandle};
use buildwatch_progress::{CurvePoint, Forecast, ProgressPredictor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Construction start date
    pub start_date: Date,

    /// Reference date of the current percent
    pub current_date: Date,

    /// Current percent complete
    pub current_percent: f64,

    /// Display form of the current percent, e.g. "50%"
    pub current_advance: String,
}

/// Predicted completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionView {
    /// Predicted completion date
    pub finish_date: Date,

    /// Days from the current date to completion
    pub days_remaining: u64,

    /// The current percent is already at or past 100%
    pub already_complete: bool,
}

/// Map framing for the side-by-side mosaics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Map centre
    pub center: GeoPoint,

    /// Initial zoom level
    pub zoom: u8,

    /// Basemap tile set
    pub basemap: String,

    /// Attribution for the mosaic layers
    pub attribution: String,

    /// Caption, e.g. "AOI (2km buffer around site)"
    pub caption: String,
}

/// Mosaic layers, or why they are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageryView {
    /// Both mosaics were produced
    Available {
        /// Mosaic at the start date
        before: MosaicHandle,
        /// Mosaic at the current date
        after: MosaicHandle,
    },
    /// The provider failed; the rest of the dashboard is still shown
    Unavailable {
        /// Provider error message
        reason: String,
    },
}

/// Everything shown for one value of the percent input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Page title
    pub title: String,

    /// Page description
    pub description: String,

    /// Map framing
    pub map: MapView,

    /// Mosaic layers
    pub imagery: ImageryView,

    /// Headline metrics
    pub metrics: Metrics,

    /// Predicted completion, if progress has been made
    pub prediction: Option<PredictionView>,

    /// Day-by-day extrapolation, when requested and a forecast exists
    pub chart: Option<Vec<CurvePoint>>,
}

/// One user's dashboard session.
///
/// Owns the mosaic cache, so repeated interactions reuse the same mosaics.
pub struct Dashboard {
    config: SiteConfig,
    predictor: ProgressPredictor,
    provider: Box<dyn ImageryProvider>,
    cache: MosaicCache,
}

impl Dashboard {
    /// Create a dashboard for `config` backed by `provider`.
    pub fn new(config: SiteConfig, provider: Box<dyn ImageryProvider>) -> Self {
        let predictor = ProgressPredictor::from_config(&config);
        Self {
            config,
            predictor,
            provider,
            cache: MosaicCache::new(),
        }
    }

    /// Site configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The predictor built from the site's dates.
    pub fn predictor(&self) -> &ProgressPredictor {
        &self.predictor
    }

    /// Mosaic cache.
    pub fn cache(&self) -> &MosaicCache {
        &self.cache
    }

    /// Build the view for `current_percent`.
    pub async fn view(&mut self, current_percent: f64, show_chart: bool) -> DashboardView {
        info!("Rendering dashboard at {}%", current_percent);

        let imagery = self.imagery().await;
        let forecast = self.predictor.forecast(current_percent);

        let prediction = match forecast {
            Forecast::Projected(projection) => Some(PredictionView {
                finish_date: projection.finish_date,
                days_remaining: projection.days_to_finish,
                already_complete: projection.already_complete,
            }),
            Forecast::Undefined => None,
        };

        let chart = if show_chart {
            self.predictor
                .curve(current_percent)
                .map(|curve| curve.collect())
        } else {
            None
        };

        DashboardView {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            map: MapView {
                center: self.config.aoi.center,
                zoom: self.config.map_zoom,
                basemap: self.config.basemap.clone(),
                attribution: self.config.imagery.attribution.clone(),
                caption: format!("AOI ({})", self.config.aoi.caption()),
            },
            imagery,
            metrics: Metrics {
                start_date: self.predictor.start_date(),
                current_date: self.predictor.current_date(),
                current_percent,
                current_advance: format!("{}%", current_percent),
            },
            prediction,
            chart,
        }
    }

    async fn imagery(&mut self) -> ImageryView {
        let result = self
            .cache
            .get_or_fetch(
                self.provider.as_ref(),
                self.config.start_date,
                self.config.reference_date,
                &self.config.aoi,
                &self.config.imagery,
            )
            .await;

        match result {
            Ok(pair) => ImageryView::Available {
                before: pair.before,
                after: pair.after,
            },
            Err(e) => {
                warn!("Imagery unavailable from {}: {}", self.provider.name(), e);
                ImageryView::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
