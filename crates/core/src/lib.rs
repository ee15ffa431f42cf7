//! Buildwatch core data models.
//!
//! This crate defines the site configuration and the observations that the
//! progress predictor and the imagery provider are built from.

#![warn(missing_docs)]

mod error;
mod observation;
mod site;

pub use error::{Error, Result};
pub use observation::Observation;
pub use site::{AreaOfInterest, GeoPoint, ImageryConfig, SiteConfig, VisParams};

/// Calendar date type
pub type Date = chrono::NaiveDate;
