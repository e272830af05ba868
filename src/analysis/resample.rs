//! Hourly resampling
//!
//! Regularizes a raw, possibly irregular series onto a fixed hourly grid by
//! averaging all readings that fall within each calendar hour. The output
//! grid covers every hour from the first to the last reading; hours with no
//! surviving readings become explicit missing entries so rolling windows
//! always see a contiguous grid.

use crate::core::{Error, HourlySeries, RawSeries, Result};
use chrono::{DateTime, TimeZone, Utc};

/// Resample a raw series onto the hourly grid it spans
pub fn resample_hourly(series: &RawSeries) -> Result<HourlySeries> {
    let readings = series.readings();
    let (Some(first), Some(last)) = (readings.first(), readings.last()) else {
        return Ok(HourlySeries::empty());
    };

    let first_hour = floor_to_hour(first.timestamp)?;
    let last_hour = floor_to_hour(last.timestamp)?;
    let slots = ((last_hour - first_hour).num_hours() + 1) as usize;

    let mut sums = vec![0.0_f64; slots];
    let mut counts = vec![0_usize; slots];
    for reading in readings {
        let slot = (floor_to_hour(reading.timestamp)? - first_hour).num_hours() as usize;
        sums[slot] += reading.value;
        counts[slot] += 1;
    }

    let values = sums
        .iter()
        .zip(&counts)
        .map(|(sum, count)| {
            if *count == 0 {
                None
            } else {
                Some(sum / *count as f64)
            }
        })
        .collect();

    HourlySeries::new(first_hour, values)
}

/// Truncate a timestamp to the start of its calendar hour
fn floor_to_hour(ts: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let secs = ts.timestamp().div_euclid(3600) * 3600;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::InvalidSeries(format!("timestamp {ts} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Reading;
    use chrono::Duration;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_averages_readings_within_hour() {
        let series = RawSeries::new(vec![
            Reading::new(at(0, 0), 10.0),
            Reading::new(at(0, 15), 20.0),
            Reading::new(at(0, 45), 30.0),
        ])
        .unwrap();

        let hourly = resample_hourly(&series).unwrap();
        assert_eq!(hourly.len(), 1);
        assert_eq!(hourly.values()[0], Some(20.0));
    }

    #[test]
    fn test_gap_hours_become_missing_entries() {
        let series = RawSeries::new(vec![
            Reading::new(at(0, 30), 10.0),
            Reading::new(at(3, 10), 40.0),
        ])
        .unwrap();

        let hourly = resample_hourly(&series).unwrap();
        assert_eq!(hourly.len(), 4);
        assert_eq!(hourly.values(), &[Some(10.0), None, None, Some(40.0)]);
    }

    #[test]
    fn test_grid_is_contiguous_without_duplicates() {
        let series = RawSeries::new(vec![
            Reading::new(at(1, 59), 1.0),
            Reading::new(at(2, 0), 2.0),
            Reading::new(at(2, 1), 3.0),
            Reading::new(at(5, 30), 4.0),
        ])
        .unwrap();

        let hourly = resample_hourly(&series).unwrap();
        let timestamps: Vec<DateTime<Utc>> = hourly.iter().map(|(ts, _)| ts).collect();

        assert_eq!(timestamps.len(), 5);
        for pair in timestamps.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::hours(1));
        }
    }

    #[test]
    fn test_duplicate_timestamps_are_averaged() {
        let series = RawSeries::new(vec![
            Reading::new(at(0, 0), 5.0),
            Reading::new(at(0, 0), 15.0),
        ])
        .unwrap();

        let hourly = resample_hourly(&series).unwrap();
        assert_eq!(hourly.values(), &[Some(10.0)]);
    }

    #[test]
    fn test_empty_series_resamples_to_empty() {
        let hourly = resample_hourly(&RawSeries::empty()).unwrap();
        assert!(hourly.is_empty());
    }
}
