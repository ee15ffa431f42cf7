//! Dashboard composition.
//!
//! Ties a site's configuration, the progress predictor and an imagery
//! provider together and produces one [`DashboardView`] per interaction.

#![warn(missing_docs)]

pub mod dashboard;
pub mod render;

pub use dashboard::{Dashboard, DashboardView, ImageryView, MapView, Metrics, PredictionView};
pub use render::{render_json, render_text};
