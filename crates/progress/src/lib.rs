//! Progress prediction.
//!
//! Linear extrapolation of construction progress from the start date to a
//! predicted finish date.

#![warn(missing_docs)]

pub mod curve;
pub mod fit;
pub mod predictor;

pub use curve::{CurvePoint, ProjectionCurve};
pub use fit::LinearFit;
pub use predictor::{Forecast, ProgressPredictor, Projection};
