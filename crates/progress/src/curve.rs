//! Dense day-by-day projection curve.

use buildwatch_core::Date;
use chrono::Days;
use serde::{Deserialize, Serialize};

use crate::fit::LinearFit;

/// Predicted progress on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Calendar day
    pub date: Date,

    /// Predicted percent complete
    pub percent: f64,
}

/// Lazy iterator over every day from the start date to the finish date,
/// inclusive.
///
/// Clone it to iterate again from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct ProjectionCurve {
    start: Date,
    fit: LinearFit,
    next: u64,
    len: u64,
}

impl ProjectionCurve {
    pub(crate) fn new(start: Date, finish: Date, fit: LinearFit) -> Self {
        let len = (finish - start).num_days().max(0) as u64 + 1;
        Self {
            start,
            fit,
            next: 0,
            len,
        }
    }

    /// The fitted line, with x in days since the start date.
    pub fn fit(&self) -> LinearFit {
        self.fit
    }

    /// Predicted percent on `date` (not limited to the curve's range).
    pub fn value_at(&self, date: Date) -> f64 {
        self.fit.predict((date - self.start).num_days() as f64)
    }

    /// A fresh iterator positioned at the start date.
    pub fn restart(&self) -> Self {
        Self {
            next: 0,
            ..self.clone()
        }
    }

    /// Total number of days covered.
    pub fn days(&self) -> u64 {
        self.len
    }
}

impl Iterator for ProjectionCurve {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let date = self.start.checked_add_days(Days::new(self.next))?;
        let percent = self.fit.predict(self.next as f64);
        self.next += 1;
        Some(CurvePoint { date, percent })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.len - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProjectionCurve {}
