//! Progress observations.

use serde::{Deserialize, Serialize};

use crate::Date;

/// A single `(date, percent complete)` measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation
    pub date: Date,

    /// Percent complete on that date
    pub percent: f64,
}

impl Observation {
    /// Create a new observation.
    pub fn new(date: Date, percent: f64) -> Self {
        Self { date, percent }
    }

    /// Construction start: zero progress on `date`.
    pub fn start(date: Date) -> Self {
        Self::new(date, 0.0)
    }

    /// Days elapsed from `self` to `later` (negative if `later` is earlier).
    pub fn days_until(&self, later: &Observation) -> i64 {
        (later.date - self.date).num_days()
    }
}
