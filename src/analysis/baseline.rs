//! Baseline estimation
//!
//! Derives the base-load reference level a facility draws when equipment is
//! powered but not producing. Two strategies, selected at configuration
//! time:
//!
//! - Rolling minimum: per-slot minimum over a trailing window, adapting to
//!   slow drift and seasonality.
//! - Percentile: a single low percentile of the valid (present, strictly
//!   positive) values, more robust to isolated low readings but assuming a
//!   stationary operating profile.

use crate::analysis::quantile;
use crate::core::{HourlySeries, LevelSeries};
use std::collections::VecDeque;

/// Baseline estimation strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaselineStrategy {
    /// Trailing-minimum baseline over `window_hours` slots
    RollingMinimum { window_hours: usize },
    /// Percentile-of-valid-values baseline with an additive tolerance on
    /// the base-load upper bound
    Percentile { percentile: f64, tolerance: f64 },
}

impl BaselineStrategy {
    /// Compute the baseline for a resampled series
    pub fn compute(&self, series: &HourlySeries) -> LevelSeries {
        match *self {
            BaselineStrategy::RollingMinimum { window_hours } => {
                LevelSeries::PerSlot(rolling_min(series.values(), window_hours))
            }
            BaselineStrategy::Percentile { percentile, .. } => {
                LevelSeries::Scalar(percentile_baseline(series, percentile))
            }
        }
    }

    /// Tolerance applied to the base-load upper bound during classification
    pub fn tolerance(&self) -> f64 {
        match *self {
            BaselineStrategy::RollingMinimum { .. } => 0.0,
            BaselineStrategy::Percentile { tolerance, .. } => tolerance,
        }
    }
}

/// Trailing minimum over a window of `window` slots ending at each slot
///
/// The first `window - 1` slots use whatever prefix exists. Slots whose
/// window contains no present value get `None`.
fn rolling_min(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    // Monotonically increasing deque of (index, value) candidates
    let mut candidates: VecDeque<(usize, f64)> = VecDeque::new();
    let mut out = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        if let Some(v) = value {
            while candidates.back().is_some_and(|&(_, back)| back >= *v) {
                candidates.pop_back();
            }
            candidates.push_back((i, *v));
        }
        while candidates.front().is_some_and(|&(j, _)| j + window <= i) {
            candidates.pop_front();
        }
        out.push(candidates.front().map(|&(_, v)| v));
    }

    out
}

/// Low percentile of the valid subset: present AND strictly positive
///
/// Zero or negative readings mean "no consumption", not low base load, so
/// they are excluded. An empty valid subset leaves the baseline undefined.
fn percentile_baseline(series: &HourlySeries, percentile: f64) -> Option<f64> {
    let mut valid: Vec<f64> = series
        .values()
        .iter()
        .flatten()
        .copied()
        .filter(|v| *v > 0.0)
        .collect();
    if valid.is_empty() {
        return None;
    }
    valid.sort_by(|a, b| a.total_cmp(b));

    quantile(&valid, percentile / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hourly(values: Vec<Option<f64>>) -> HourlySeries {
        let start = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        HourlySeries::new(start, values).unwrap()
    }

    #[test]
    fn test_rolling_min_uses_prefix_before_window_fills() {
        let baselines = rolling_min(&[Some(10.0), Some(12.0), Some(9.0)], 3);
        assert_eq!(baselines, vec![Some(10.0), Some(10.0), Some(9.0)]);
    }

    #[test]
    fn test_rolling_min_forgets_values_outside_window() {
        let baselines = rolling_min(&[Some(1.0), Some(5.0), Some(6.0), Some(7.0)], 2);
        assert_eq!(baselines, vec![Some(1.0), Some(1.0), Some(5.0), Some(6.0)]);
    }

    #[test]
    fn test_rolling_min_skips_missing_slots() {
        let baselines = rolling_min(&[Some(4.0), None, Some(6.0)], 3);
        assert_eq!(baselines, vec![Some(4.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn test_rolling_min_all_missing_window_is_undefined() {
        let baselines = rolling_min(&[None, None, Some(3.0)], 2);
        assert_eq!(baselines, vec![None, None, Some(3.0)]);
    }

    #[test]
    fn test_percentile_excludes_nonpositive_and_missing() {
        let series = hourly(vec![
            Some(0.0),
            Some(-2.0),
            None,
            Some(1.0),
            Some(1.0),
            Some(50.0),
        ]);
        let strategy = BaselineStrategy::Percentile {
            percentile: 10.0,
            tolerance: 0.5,
        };

        let LevelSeries::Scalar(Some(baseline)) = strategy.compute(&series) else {
            panic!("expected a defined scalar baseline");
        };
        // Valid subset is [1, 1, 50]; the 10th percentile stays at 1
        assert!((baseline - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_undefined_when_no_valid_values() {
        let series = hourly(vec![Some(0.0), Some(-1.0), None]);
        let strategy = BaselineStrategy::Percentile {
            percentile: 10.0,
            tolerance: 0.5,
        };

        assert!(matches!(
            strategy.compute(&series),
            LevelSeries::Scalar(None)
        ));
    }

    #[test]
    fn test_percentile_interpolates_between_ranks() {
        let series = hourly((1..=5).map(|v| Some(v as f64)).collect());
        let strategy = BaselineStrategy::Percentile {
            percentile: 25.0,
            tolerance: 0.5,
        };

        let LevelSeries::Scalar(Some(baseline)) = strategy.compute(&series) else {
            panic!("expected a defined scalar baseline");
        };
        assert!((baseline - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_is_zero_for_rolling_minimum() {
        assert_eq!(
            BaselineStrategy::RollingMinimum { window_hours: 720 }.tolerance(),
            0.0
        );
        assert_eq!(
            BaselineStrategy::Percentile {
                percentile: 10.0,
                tolerance: 0.5
            }
            .tolerance(),
            0.5
        );
    }
}
