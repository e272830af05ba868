//! Weekly pattern analysis
//!
//! Characterizes the recurring seven-day shape of a sensor: the mean draw
//! per (weekday, hour-of-day) bucket, plus a trailing rolling average and
//! the per-slot deviations from it. Useful for spotting weeks that break
//! the usual production rhythm.

use crate::core::HourlySeries;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// Mean consumption per weekday and hour of day
///
/// Rows are weekdays (Monday = 0), columns are hours. Buckets never seen in
/// the data stay undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyProfile {
    means: [[Option<f64>; 24]; 7],
}

impl WeeklyProfile {
    /// Mean for one (weekday, hour) bucket; Monday = 0
    pub fn mean_at(&self, weekday: usize, hour: usize) -> Option<f64> {
        self.means
            .get(weekday)
            .and_then(|row| row.get(hour))
            .copied()
            .flatten()
    }
}

/// Result of a weekly pattern analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub profile: WeeklyProfile,
    /// Trailing rolling mean per slot (window = 7 * 24 * lookback_weeks)
    pub rolling_mean: Vec<Option<f64>>,
    /// Per-slot deviation from the rolling mean
    pub deviations: Vec<Option<f64>>,
}

/// Analyze the weekly pattern of a resampled series
pub fn analyze_pattern(hourly: &HourlySeries, lookback_weeks: usize) -> PatternAnalysis {
    let mut sums = [[0.0_f64; 24]; 7];
    let mut counts = [[0_usize; 24]; 7];

    for (ts, value) in hourly.iter() {
        if let Some(v) = value {
            let weekday = ts.weekday().num_days_from_monday() as usize;
            let hour = ts.hour() as usize;
            sums[weekday][hour] += v;
            counts[weekday][hour] += 1;
        }
    }

    let mut means = [[None; 24]; 7];
    for weekday in 0..7 {
        for hour in 0..24 {
            if counts[weekday][hour] > 0 {
                means[weekday][hour] = Some(sums[weekday][hour] / counts[weekday][hour] as f64);
            }
        }
    }

    let window = 7 * 24 * lookback_weeks.max(1);
    let rolling = rolling_mean(hourly.values(), window);
    let deviations = hourly
        .values()
        .iter()
        .zip(&rolling)
        .map(|(value, mean)| match (value, mean) {
            (Some(v), Some(m)) => Some(v - m),
            _ => None,
        })
        .collect();

    PatternAnalysis {
        profile: WeeklyProfile { means },
        rolling_mean: rolling,
        deviations,
    }
}

/// Trailing mean over a window of `window` slots ending at each slot
///
/// Missing slots contribute nothing; a window with no present values
/// yields an undefined mean.
fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let mut sum = 0.0_f64;
    let mut count = 0_usize;
    let mut out = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        if let Some(v) = value {
            sum += v;
            count += 1;
        }
        if i >= window {
            if let Some(leaving) = values[i - window] {
                sum -= leaving;
                count -= 1;
            }
        }
        if count == 0 {
            out.push(None);
        } else {
            out.push(Some(sum / count as f64));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_rolling_mean_over_prefix() {
        let means = rolling_mean(&[Some(2.0), Some(4.0), Some(6.0)], 4);
        assert_eq!(means, vec![Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_rolling_mean_drops_values_leaving_window() {
        let means = rolling_mean(&[Some(2.0), Some(4.0), Some(6.0)], 2);
        assert_eq!(means, vec![Some(2.0), Some(3.0), Some(5.0)]);
    }

    #[test]
    fn test_rolling_mean_handles_missing() {
        let means = rolling_mean(&[Some(2.0), None, Some(6.0)], 2);
        assert_eq!(means, vec![Some(2.0), Some(2.0), Some(6.0)]);
    }

    #[test]
    fn test_profile_buckets_by_weekday_and_hour() {
        // 2023-03-06 is a Monday; two full days starting 00:00
        let start = Utc.with_ymd_and_hms(2023, 3, 6, 0, 0, 0).unwrap();
        let mut values = vec![Some(10.0); 24];
        values.extend(vec![Some(30.0); 24]);
        let hourly = HourlySeries::new(start, values).unwrap();

        let analysis = analyze_pattern(&hourly, 1);

        assert_eq!(analysis.profile.mean_at(0, 5), Some(10.0));
        assert_eq!(analysis.profile.mean_at(1, 5), Some(30.0));
        // Wednesday never observed
        assert_eq!(analysis.profile.mean_at(2, 5), None);
    }

    #[test]
    fn test_deviations_are_value_minus_rolling_mean() {
        let start = Utc.with_ymd_and_hms(2023, 3, 6, 0, 0, 0).unwrap();
        let hourly = HourlySeries::new(start, vec![Some(10.0), Some(20.0), None]).unwrap();

        let analysis = analyze_pattern(&hourly, 1);

        assert_eq!(analysis.deviations[0], Some(0.0));
        assert_eq!(analysis.deviations[1], Some(5.0));
        assert_eq!(analysis.deviations[2], None);
    }
}
