//! Regime analysis pipeline
//!
//! Orchestrates the full classification: outlier filtering, hourly
//! resampling, date-range restriction, baseline estimation, threshold
//! derivation, per-slot labeling and summary aggregation. An analyzer is
//! configured once and can process any number of sensors; each analysis is
//! a pure function of its input series, so sensors may be processed in any
//! order or in parallel.

pub mod baseline;
pub mod classify;
pub mod outlier;
pub mod profile;
pub mod resample;

pub use baseline::BaselineStrategy;
pub use classify::{classify, classify_series, derive_threshold};
pub use outlier::OutlierMethod;
pub use profile::{PatternAnalysis, WeeklyProfile};
pub use resample::resample_hourly;

use crate::core::{AnalysisResult, Config, HourlySeries, RawSeries, Result};
use crate::report::summarize;
use crate::source::SeriesSource;

/// Regime analyzer configured from the application config
pub struct RegimeAnalyzer {
    config: Config,
}

impl RegimeAnalyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Outlier method selected by the configuration
    pub fn outlier_method(&self) -> OutlierMethod {
        match self.config.outlier.method.as_str() {
            "fixed_threshold" => OutlierMethod::FixedThreshold {
                max_value: self.config.outlier.max_value,
            },
            _ => OutlierMethod::Iqr {
                factor: self.config.outlier.iqr_factor,
            }, // Default to IQR
        }
    }

    /// Baseline strategy selected by the configuration
    pub fn baseline_strategy(&self) -> BaselineStrategy {
        match self.config.baseline.method.as_str() {
            "percentile" => BaselineStrategy::Percentile {
                percentile: self.config.baseline.percentile,
                tolerance: self.config.baseline.tolerance,
            },
            _ => BaselineStrategy::RollingMinimum {
                window_hours: self.config.baseline.window_hours,
            }, // Default to rolling minimum
        }
    }

    /// Filter, resample and range-restrict a raw series
    fn prepare(&self, raw: &RawSeries) -> Result<HourlySeries> {
        let filtered = self.outlier_method().filter(raw);
        let hourly = resample_hourly(&filtered)?;
        match self.config.range.date_range()? {
            Some(range) => Ok(hourly.restrict(&range)),
            None => Ok(hourly),
        }
    }

    /// Run the full regime classification for one sensor's raw series
    ///
    /// Empty input, nothing surviving the outlier filter, or a date range
    /// outside the data all yield an empty result rather than an error.
    pub fn analyze(&self, raw: &RawSeries) -> Result<AnalysisResult> {
        let hourly = self.prepare(raw)?;
        if hourly.is_empty() {
            log::debug!("No hourly data after filtering and range restriction");
            return Ok(AnalysisResult::empty());
        }

        let strategy = self.baseline_strategy();
        let baseline = strategy.compute(&hourly);
        let threshold = derive_threshold(&strategy, &baseline, hourly.max_value());
        let labels = classify_series(&hourly, &baseline, &threshold, strategy.tolerance());
        let summary = summarize(&hourly, &labels, &baseline, &threshold);

        Ok(AnalysisResult {
            hourly,
            labels,
            baseline,
            threshold,
            summary,
        })
    }

    /// Run the weekly pattern analysis for one sensor's raw series
    pub fn analyze_pattern(&self, raw: &RawSeries) -> Result<PatternAnalysis> {
        let hourly = self.prepare(raw)?;
        Ok(profile::analyze_pattern(
            &hourly,
            self.config.baseline.lookback_weeks,
        ))
    }

    /// Analyze a set of sensors from a source
    ///
    /// An empty `sensors` slice means every sensor the source offers.
    /// Sensors without data produce empty results and a warning instead of
    /// aborting the run.
    pub fn analyze_all(
        &self,
        source: &dyn SeriesSource,
        sensors: &[String],
    ) -> Result<Vec<(String, AnalysisResult)>> {
        let ids: Vec<String> = if sensors.is_empty() {
            source.sensor_ids()
        } else {
            sensors.to_vec()
        };

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let result = match source.fetch(&id)? {
                Some(series) if !series.is_empty() => self.analyze(&series)?,
                Some(_) => {
                    log::warn!("Sensor {} has no readings", id);
                    AnalysisResult::empty()
                }
                None => {
                    log::warn!("Sensor {} not available from source {}", id, source.name());
                    AnalysisResult::empty()
                }
            };
            results.push((id, result));
        }

        Ok(results)
    }
}

/// Quantile with linear interpolation between ranks over sorted data
///
/// `q` in [0, 1]. Interpolates between neighboring ranks instead of
/// snapping to a sample, so quartile bounds and percentile baselines vary
/// smoothly with the data.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = pos - lo as f64;
        Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
    }
}
