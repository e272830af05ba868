//! Regime classification
//!
//! Derives the idle/production threshold from the baseline and the observed
//! maximum, then labels every hourly slot. Classification is pure
//! arithmetic per slot; there is no cross-slot state beyond the supplied
//! baseline and threshold.

use crate::analysis::baseline::BaselineStrategy;
use crate::core::{HourlySeries, LevelSeries, Regime};

/// Idle/production boundary for one slot
///
/// The two strategies deliberately use different formulas; the percentile
/// variant puts the production band at the top two thirds of the range
/// above the baseline rather than the midpoint. Unifying them would
/// silently change classification results.
fn threshold_value(strategy: &BaselineStrategy, baseline: f64, max_value: f64) -> f64 {
    match strategy {
        BaselineStrategy::RollingMinimum { .. } => (max_value + baseline) / 2.0,
        BaselineStrategy::Percentile { .. } => baseline + (max_value - baseline) / 3.0,
    }
}

/// Derive the threshold level(s) matching the shape of the baseline
///
/// Slots with an undefined baseline, or a series with no observed maximum,
/// get an undefined threshold; they must never be used to classify.
pub fn derive_threshold(
    strategy: &BaselineStrategy,
    baseline: &LevelSeries,
    max_value: Option<f64>,
) -> LevelSeries {
    let derive = |b: Option<f64>| match (b, max_value) {
        (Some(b), Some(m)) => Some(threshold_value(strategy, b, m)),
        _ => None,
    };

    match baseline {
        LevelSeries::Scalar(b) => LevelSeries::Scalar(derive(*b)),
        LevelSeries::PerSlot(bs) => LevelSeries::PerSlot(bs.iter().map(|b| derive(*b)).collect()),
    }
}

/// Classify a single slot
///
/// Evaluation order: missing, no consumption, then the baseline bands. An
/// undefined baseline or threshold degrades the slot to `Missing` rather
/// than risking a misclassification.
pub fn classify(
    value: Option<f64>,
    baseline: Option<f64>,
    threshold: Option<f64>,
    tolerance: f64,
) -> Regime {
    let Some(v) = value else {
        return Regime::Missing;
    };
    if v <= 0.0 {
        return Regime::NoConsumption;
    }
    let (Some(b), Some(t)) = (baseline, threshold) else {
        return Regime::Missing;
    };

    if v <= b + tolerance {
        Regime::BaseLoad
    } else if v <= t {
        Regime::Idle
    } else {
        Regime::Production
    }
}

/// Label every slot of a resampled series
pub fn classify_series(
    hourly: &HourlySeries,
    baseline: &LevelSeries,
    threshold: &LevelSeries,
    tolerance: f64,
) -> Vec<Regime> {
    hourly
        .values()
        .iter()
        .enumerate()
        .map(|(i, value)| classify(*value, baseline.at(i), threshold.at(i), tolerance))
        .collect()
}
