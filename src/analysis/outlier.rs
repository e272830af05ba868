//! Outlier filtering
//!
//! Removes implausible readings before resampling. Supports two methods:
//! - IQR: readings outside `[Q1 - f*IQR, Q3 + f*IQR]` are dropped
//! - Fixed threshold: readings above a literal upper bound are dropped
//!
//! Out-of-range readings are dropped entirely, never clamped or
//! interpolated; the resampler later surfaces the resulting gaps as
//! missing hours.

use crate::analysis::quantile;
use crate::core::RawSeries;

/// Outlier detection method
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Keep readings within `factor` interquartile ranges of the quartiles
    Iqr { factor: f64 },
    /// Keep readings at or below a fixed upper bound
    FixedThreshold { max_value: f64 },
}

impl OutlierMethod {
    /// Filter a raw series, keeping only in-range readings
    ///
    /// An empty input (or one where nothing survives) yields an empty
    /// series, not an error.
    pub fn filter(&self, series: &RawSeries) -> RawSeries {
        if series.is_empty() {
            return RawSeries::empty();
        }

        match *self {
            OutlierMethod::Iqr { factor } => {
                let mut sorted: Vec<f64> = series.values().collect();
                sorted.sort_by(|a, b| a.total_cmp(b));

                let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75))
                else {
                    return RawSeries::empty();
                };
                let iqr = q3 - q1;
                let lower = q1 - factor * iqr;
                let upper = q3 + factor * iqr;

                keep(series, |v| v >= lower && v <= upper)
            }
            OutlierMethod::FixedThreshold { max_value } => keep(series, |v| v <= max_value),
        }
    }
}

fn keep(series: &RawSeries, pred: impl Fn(f64) -> bool) -> RawSeries {
    RawSeries::from_sorted(
        series
            .readings()
            .iter()
            .copied()
            .filter(|r| pred(r.value))
            .collect(),
    )
}
