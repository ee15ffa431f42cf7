//! Finish-date prediction.

use buildwatch_core::{Date, Error, Observation, SiteConfig};
use chrono::Days;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::curve::ProjectionCurve;
use crate::fit::LinearFit;

/// Percent at which construction counts as finished.
const COMPLETE: f64 = 100.0;

/// A projected finish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Date the extrapolated progress reaches 100%
    pub finish_date: Date,

    /// Whole days from the current date to the finish date
    pub days_to_finish: u64,

    /// Progress rate in percent per day
    pub slope: f64,

    /// The current percent is already at or past 100%
    pub already_complete: bool,
}

/// Outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Forecast {
    /// A finish date could be extrapolated
    Projected(Projection),
    /// No progress has been made, so no finish date exists
    Undefined,
}

impl Forecast {
    /// The projection, if any.
    pub fn projection(&self) -> Option<&Projection> {
        match self {
            Forecast::Projected(projection) => Some(projection),
            Forecast::Undefined => None,
        }
    }

    /// The predicted finish date, if any.
    pub fn finish_date(&self) -> Option<Date> {
        self.projection().map(|p| p.finish_date)
    }
}

/// Two-point linear progress predictor.
///
/// The start observation is fixed at 0% on `start_date`; the current
/// observation is the caller's percent on `current_date`. Percent values are
/// not clamped: negative values forecast nothing and values above 100 are
/// treated as already complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPredictor {
    start_date: Date,
    current_date: Date,
}

impl ProgressPredictor {
    /// Create a predictor for the given start and current dates.
    ///
    /// `start_date` is expected to be strictly before `current_date`; this is
    /// not checked. If it is not, elapsed time is treated as one day. Use
    /// [`ProgressPredictor::try_new`] to reject such dates instead.
    pub fn new(start_date: Date, current_date: Date) -> Self {
        Self {
            start_date,
            current_date,
        }
    }

    /// Create a predictor, failing unless `start_date < current_date`.
    pub fn try_new(start_date: Date, current_date: Date) -> buildwatch_core::Result<Self> {
        if start_date >= current_date {
            return Err(Error::DateOrder {
                start: start_date,
                reference: current_date,
            });
        }
        Ok(Self::new(start_date, current_date))
    }

    /// Create a predictor from a site's configured dates.
    ///
    /// Date order is checked by [`SiteConfig::validate`], not here.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.start_date, config.reference_date)
    }

    /// Construction start date.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Date the current percent refers to.
    pub fn current_date(&self) -> Date {
        self.current_date
    }

    /// Days between start and current date, never less than one.
    pub fn elapsed_days(&self) -> i64 {
        (self.current_date - self.start_date).num_days().max(1)
    }

    /// Progress rate in percent per day.
    pub fn slope(&self, current_percent: f64) -> f64 {
        current_percent / self.elapsed_days() as f64
    }

    /// The two observations the line is drawn through.
    pub fn observations(&self, current_percent: f64) -> [Observation; 2] {
        [
            Observation::start(self.start_date),
            Observation::new(self.current_date, current_percent),
        ]
    }

    /// Predict the finish date for `current_percent`.
    pub fn forecast(&self, current_percent: f64) -> Forecast {
        let slope = self.slope(current_percent);
        if !(slope > 0.0) {
            debug!("No progress at {}%, no forecast", current_percent);
            return Forecast::Undefined;
        }

        let already_complete = current_percent >= COMPLETE;
        let days_to_finish = if already_complete {
            0
        } else {
            ((COMPLETE - current_percent) / slope).floor() as u64
        };

        let Some(finish_date) = self.current_date.checked_add_days(Days::new(days_to_finish))
        else {
            warn!(
                "Finish date {} days after {} is out of range",
                days_to_finish, self.current_date
            );
            return Forecast::Undefined;
        };

        debug!(
            "Forecast at {}%: {:.5}%/day, {} days to finish ({})",
            current_percent, slope, days_to_finish, finish_date
        );

        Forecast::Projected(Projection {
            finish_date,
            days_to_finish,
            slope,
            already_complete,
        })
    }

    /// Day-by-day projected progress from the start date to the finish date.
    ///
    /// Returns `None` when there is no forecast.
    pub fn curve(&self, current_percent: f64) -> Option<ProjectionCurve> {
        let projection = *self.forecast(current_percent).projection()?;
        let [start, current] = self.observations(current_percent);
        let points = [
            (0.0, start.percent),
            (start.days_until(&current).max(1) as f64, current.percent),
        ];
        let fit = LinearFit::fit(&points)?;
        Some(ProjectionCurve::new(
            self.start_date,
            projection.finish_date,
            fit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> Date {
        Date::from_ymd_opt(year, month, day).unwrap()
    }

    fn predictor() -> ProgressPredictor {
        ProgressPredictor::new(date(2019, 1, 19), date(2025, 2, 26))
    }

    #[test]
    fn test_elapsed_days() {
        assert_eq!(predictor().elapsed_days(), 2230);
    }

    #[test]
    fn test_elapsed_days_clamped_to_one() {
        let same_day = ProgressPredictor::new(date(2025, 2, 26), date(2025, 2, 26));
        assert_eq!(same_day.elapsed_days(), 1);
        assert_eq!(same_day.slope(10.0), 10.0);
    }

    #[test]
    fn test_half_complete() {
        let p = predictor();
        let forecast = p.forecast(50.0);
        let projection = forecast.projection().unwrap();

        assert!((projection.slope - 0.02242).abs() < 1e-4);
        assert_eq!(projection.days_to_finish, 2230);
        assert_eq!(projection.finish_date, date(2031, 4, 6));
        assert!(!projection.already_complete);
    }

    #[test]
    fn test_no_progress_is_undefined() {
        let p = predictor();
        assert_eq!(p.forecast(0.0), Forecast::Undefined);
        assert_eq!(p.forecast(-5.0), Forecast::Undefined);
        assert_eq!(p.forecast(f64::NAN), Forecast::Undefined);
        assert!(p.curve(0.0).is_none());
        assert!(p.forecast(0.0).finish_date().is_none());
    }

    #[test]
    fn test_complete_finishes_today() {
        let p = predictor();
        let projection = *p.forecast(100.0).projection().unwrap();
        assert_eq!(projection.days_to_finish, 0);
        assert_eq!(projection.finish_date, date(2025, 2, 26));
        assert!(projection.already_complete);
    }

    #[test]
    fn test_over_complete_clamps_to_today() {
        let projection = *predictor().forecast(120.0).projection().unwrap();
        assert_eq!(projection.days_to_finish, 0);
        assert_eq!(projection.finish_date, date(2025, 2, 26));
        assert!(projection.already_complete);
    }

    #[test]
    fn test_other_percentages() {
        let p = predictor();
        assert_eq!(p.forecast(75.0).finish_date(), Some(date(2027, 3, 11)));
        assert_eq!(p.forecast(99.0).finish_date(), Some(date(2025, 3, 20)));
        assert_eq!(p.forecast(25.0).finish_date(), Some(date(2043, 6, 22)));
    }

    #[test]
    fn test_out_of_range_finish_is_undefined() {
        assert_eq!(predictor().forecast(1e-300), Forecast::Undefined);
    }

    #[test]
    fn test_finish_never_before_current() {
        let p = predictor();
        for pct in 1..=100 {
            let finish = p.forecast(pct as f64).finish_date().unwrap();
            assert!(finish >= p.current_date(), "{}% finished early", pct);
        }
    }

    #[test]
    fn test_days_to_finish_monotonic() {
        let p = predictor();
        let mut previous = u64::MAX;
        for pct in 1..=100 {
            let days = p.forecast(pct as f64).projection().unwrap().days_to_finish;
            assert!(days <= previous, "{}% increased days to finish", pct);
            previous = days;
        }
    }

    #[test]
    fn test_forecast_is_pure() {
        let p = predictor();
        assert_eq!(p.forecast(42.0), p.forecast(42.0));
        let a: Vec<_> = p.curve(42.0).unwrap().collect();
        let b: Vec<_> = p.curve(42.0).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_observations() {
        let [start, current] = predictor().observations(30.0);
        assert_eq!(start, Observation::new(date(2019, 1, 19), 0.0));
        assert_eq!(current, Observation::new(date(2025, 2, 26), 30.0));
    }

    #[test]
    fn test_try_new_checks_date_order() {
        let p = ProgressPredictor::try_new(date(2019, 1, 19), date(2025, 2, 26)).unwrap();
        assert_eq!(p, predictor());

        let same_day = ProgressPredictor::try_new(date(2025, 2, 26), date(2025, 2, 26));
        assert!(matches!(same_day, Err(Error::DateOrder { .. })));

        let reversed = ProgressPredictor::try_new(date(2025, 2, 26), date(2019, 1, 19));
        assert!(matches!(reversed, Err(Error::DateOrder { .. })));
    }

    #[test]
    fn test_same_day_still_curves() {
        let same_day = ProgressPredictor::new(date(2025, 2, 26), date(2025, 2, 26));
        let curve = same_day.curve(50.0).unwrap();
        assert!((curve.fit().slope - 50.0).abs() < 1e-12);
        assert_eq!(curve.days(), 2);
    }

    #[test]
    fn test_from_config() {
        let config = SiteConfig::default();
        let p = ProgressPredictor::from_config(&config);
        assert_eq!(p.start_date(), config.start_date);
        assert_eq!(p.current_date(), config.reference_date);
    }
}
