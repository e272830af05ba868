//! Common types used across the application

use crate::core::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A single energy reading from a sensor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reading {
    /// Timestamp of the reading
    pub timestamp: DateTime<Utc>,
    /// Energy consumption in kWh
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Raw timestamped series as delivered by a data source
///
/// Readings may be irregularly spaced and may contain duplicate timestamps;
/// the resampler takes care of regularizing them. Construction sorts readings
/// by timestamp and rejects non-finite values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSeries {
    readings: Vec<Reading>,
}

impl RawSeries {
    /// Build a series from readings, sorting by timestamp
    pub fn new(mut readings: Vec<Reading>) -> Result<Self> {
        if let Some(bad) = readings.iter().find(|r| !r.value.is_finite()) {
            return Err(Error::InvalidSeries(format!(
                "non-finite value {} at {}",
                bad.value, bad.timestamp
            )));
        }
        readings.sort_by_key(|r| r.timestamp);
        Ok(Self { readings })
    }

    /// An empty series
    pub fn empty() -> Self {
        Self::default()
    }

    /// Internal constructor for readings already validated and sorted
    pub(crate) fn from_sorted(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Values of all readings, in timestamp order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.value)
    }
}

/// Inclusive calendar date range for restricting an analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First hour covered by the range (start day at 00:00 UTC)
    pub fn first_hour(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN))
    }

    /// Last hour covered by the range (end day at 23:00 UTC)
    pub fn last_hour(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.end.and_time(NaiveTime::MIN)) + Duration::hours(23)
    }
}

/// Series on a uniform hourly grid
///
/// Slot `i` holds the mean consumption for the hour starting at
/// `start + i hours`. Hours without readings are explicit `None` entries,
/// so the grid is contiguous by construction and safe for fixed-size
/// rolling windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlySeries {
    start: Option<DateTime<Utc>>,
    values: Vec<Option<f64>>,
}

impl HourlySeries {
    /// Build a grid starting at the given hour boundary
    pub fn new(start: DateTime<Utc>, values: Vec<Option<f64>>) -> Result<Self> {
        if start.minute() != 0 || start.second() != 0 || start.nanosecond() != 0 {
            return Err(Error::InvalidSeries(format!(
                "grid start {start} is not aligned to an hour boundary"
            )));
        }
        Ok(Self {
            start: Some(start),
            values,
        })
    }

    /// A series with no slots at all
    pub fn empty() -> Self {
        Self {
            start: None,
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Timestamp of slot `i`
    pub fn timestamp(&self, i: usize) -> Option<DateTime<Utc>> {
        let start = self.start?;
        if i < self.values.len() {
            Some(start + Duration::hours(i as i64))
        } else {
            None
        }
    }

    /// Iterate over (timestamp, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Option<f64>)> + '_ {
        let start = self.start;
        self.values.iter().enumerate().filter_map(move |(i, v)| {
            start.map(|s| (s + Duration::hours(i as i64), *v))
        })
    }

    /// Maximum over all present values, if any
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
    }

    /// Restrict the grid to the slots inside the given date range
    ///
    /// The intersection of the grid with the range; a range entirely outside
    /// the available data yields an empty series.
    pub fn restrict(&self, range: &DateRange) -> HourlySeries {
        let Some(start) = self.start else {
            return HourlySeries::empty();
        };

        let first = range.first_hour();
        let last = range.last_hour();
        let grid_last = start + Duration::hours(self.values.len() as i64 - 1);
        if last < start || first > grid_last {
            return HourlySeries::empty();
        }

        let lo = if first <= start {
            0
        } else {
            ((first - start).num_hours()) as usize
        };
        let hi = if last >= grid_last {
            self.values.len()
        } else {
            ((last - start).num_hours() + 1) as usize
        };

        HourlySeries {
            start: Some(start + Duration::hours(lo as i64)),
            values: self.values[lo..hi].to_vec(),
        }
    }
}

/// Operational regime assigned to one hourly slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Minimum sustained draw: equipment powered but not producing
    BaseLoad,
    /// Above base load but below the production threshold
    Idle,
    /// Active operation
    Production,
    /// Reading present but zero or negative
    NoConsumption,
    /// No reading for this hour
    Missing,
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Regime::BaseLoad => "base_load",
            Regime::Idle => "idle",
            Regime::Production => "production",
            Regime::NoConsumption => "no_consumption",
            Regime::Missing => "missing",
        };
        f.write_str(name)
    }
}

/// A reference level (baseline or idle/production threshold)
///
/// The percentile strategy derives a single site-wide scalar; the
/// rolling-minimum strategy derives one level per grid slot. `None` entries
/// mark slots (or whole series) where the level is undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSeries {
    Scalar(Option<f64>),
    PerSlot(Vec<Option<f64>>),
}

impl LevelSeries {
    /// Level applying to slot `i`
    pub fn at(&self, i: usize) -> Option<f64> {
        match self {
            LevelSeries::Scalar(v) => *v,
            LevelSeries::PerSlot(values) => values.get(i).copied().flatten(),
        }
    }

    /// Single representative level: the scalar itself, or the mean over
    /// defined slots for per-slot series
    pub fn level(&self) -> Option<f64> {
        match self {
            LevelSeries::Scalar(v) => *v,
            LevelSeries::PerSlot(values) => {
                let defined: Vec<f64> = values.iter().flatten().copied().collect();
                if defined.is_empty() {
                    None
                } else {
                    Some(defined.iter().sum::<f64>() / defined.len() as f64)
                }
            }
        }
    }
}

/// Flat per-sensor summary of a regime analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeSummary {
    /// Baseline level (scalar, or mean of the rolling minimum)
    pub baseline_level: Option<f64>,
    /// Idle/production threshold (scalar, or mean of the per-slot threshold)
    pub idle_threshold: Option<f64>,
    /// Mean consumption of base-load hours
    pub mean_base_load: Option<f64>,
    /// Mean consumption of idle hours
    pub mean_idle: Option<f64>,
    /// Mean consumption of production hours
    pub mean_production: Option<f64>,
    /// Mean consumption of no-consumption hours
    pub mean_no_consumption: Option<f64>,
    /// Slot counts per regime
    pub base_load_hours: usize,
    pub idle_hours: usize,
    pub production_hours: usize,
    pub no_consumption_hours: usize,
    pub missing_hours: usize,
}

impl RegimeSummary {
    /// Summary for an empty analysis: every statistic undefined
    pub fn empty() -> Self {
        Self {
            baseline_level: None,
            idle_threshold: None,
            mean_base_load: None,
            mean_idle: None,
            mean_production: None,
            mean_no_consumption: None,
            base_load_hours: 0,
            idle_hours: 0,
            production_hours: 0,
            no_consumption_hours: 0,
            missing_hours: 0,
        }
    }
}

/// Complete result of one regime analysis
///
/// Everything the reporter/visualizer needs: the resampled series, one label
/// per slot, the baseline and threshold reference levels, and the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub hourly: HourlySeries,
    pub labels: Vec<Regime>,
    pub baseline: LevelSeries,
    pub threshold: LevelSeries,
    pub summary: RegimeSummary,
}

impl AnalysisResult {
    /// Result for an empty or out-of-range input: a valid, reportable state
    pub fn empty() -> Self {
        Self {
            hourly: HourlySeries::empty(),
            labels: Vec::new(),
            baseline: LevelSeries::Scalar(None),
            threshold: LevelSeries::Scalar(None),
            summary: RegimeSummary::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_raw_series_sorts_readings() {
        let series = RawSeries::new(vec![
            Reading::new(hour(2), 3.0),
            Reading::new(hour(0), 1.0),
            Reading::new(hour(1), 2.0),
        ])
        .unwrap();

        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_raw_series_rejects_non_finite() {
        let result = RawSeries::new(vec![Reading::new(hour(0), f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_hourly_series_rejects_unaligned_start() {
        let start = Utc.with_ymd_and_hms(2023, 3, 1, 0, 30, 0).unwrap();
        assert!(HourlySeries::new(start, vec![Some(1.0)]).is_err());
    }

    #[test]
    fn test_hourly_series_timestamps_are_contiguous() {
        let series = HourlySeries::new(hour(0), vec![Some(1.0), None, Some(3.0)]).unwrap();

        assert_eq!(series.timestamp(0), Some(hour(0)));
        assert_eq!(series.timestamp(1), Some(hour(1)));
        assert_eq!(series.timestamp(2), Some(hour(2)));
        assert_eq!(series.timestamp(3), None);
    }

    #[test]
    fn test_restrict_outside_coverage_is_empty() {
        let series = HourlySeries::new(hour(0), vec![Some(1.0), Some(2.0)]).unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();

        assert!(series.restrict(&range).is_empty());
    }

    #[test]
    fn test_restrict_keeps_covered_slots() {
        // Grid spanning Feb 28 22:00 .. Mar 1 01:00
        let start = Utc.with_ymd_and_hms(2023, 2, 28, 22, 0, 0).unwrap();
        let series =
            HourlySeries::new(start, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]).unwrap();

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        )
        .unwrap();
        let restricted = series.restrict(&range);

        assert_eq!(restricted.len(), 2);
        assert_eq!(restricted.timestamp(0), Some(hour(0)));
        assert_eq!(restricted.values(), &[Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let result = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 3, 30).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_level_series_mean_of_rolling() {
        let level = LevelSeries::PerSlot(vec![Some(2.0), None, Some(4.0)]);
        assert_eq!(level.level(), Some(3.0));
        assert_eq!(level.at(1), None);

        let empty = LevelSeries::PerSlot(vec![None, None]);
        assert_eq!(empty.level(), None);
    }

    #[test]
    fn test_max_value_ignores_missing() {
        let series = HourlySeries::new(hour(0), vec![None, Some(2.0), Some(5.0), None]).unwrap();
        assert_eq!(series.max_value(), Some(5.0));

        let all_missing = HourlySeries::new(hour(0), vec![None, None]).unwrap();
        assert_eq!(all_missing.max_value(), None);
    }
}
