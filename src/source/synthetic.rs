//! Synthetic series source
//!
//! Generates deterministic factory-shaped consumption profiles so the
//! binaries and tests can run without a metering backend. Weekday working
//! hours draw at production level, evenings at idle level, nights and
//! weekends at base load, with occasional gaps and spikes mixed in to
//! exercise the filtering stages.

use crate::core::{RawSeries, Reading, Result};
use crate::source::SeriesSource;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Synthetic profile of one machine
#[derive(Debug, Clone)]
struct Machine {
    id: String,
    /// Standby draw in kWh
    base: f64,
    /// Idle draw in kWh
    idle: f64,
    /// Production draw in kWh
    production: f64,
    seed: u64,
}

/// Deterministic in-memory source with factory-shaped profiles
#[derive(Debug)]
pub struct SyntheticSource {
    start: NaiveDate,
    days: u32,
    machines: Vec<Machine>,
}

impl SyntheticSource {
    /// Create a source covering `days` days starting at `start`
    pub fn new(start: NaiveDate, days: u32) -> Self {
        let machines = vec![
            Machine {
                id: "3210 - Fiberlaser (kWh)".to_string(),
                base: 6.0,
                idle: 18.0,
                production: 62.0,
                seed: 0x5eed_3210,
            },
            Machine {
                id: "3250 - Press (kWh)".to_string(),
                base: 9.5,
                idle: 27.0,
                production: 88.0,
                seed: 0x5eed_3250,
            },
            Machine {
                id: "Kompressor - S2PP (kWh)".to_string(),
                base: 4.0,
                idle: 11.0,
                production: 34.0,
                seed: 0x5eed_52bb,
            },
        ];

        Self {
            start,
            days,
            machines,
        }
    }

    fn generate(&self, machine: &Machine) -> RawSeries {
        let first = Utc.from_utc_datetime(&self.start.and_time(chrono::NaiveTime::MIN));
        let mut state = machine.seed;
        let mut readings = Vec::new();

        for hour_index in 0..u64::from(self.days) * 24 {
            let hour: DateTime<Utc> = first + Duration::hours(hour_index as i64);

            // Meter outage: drop the whole hour
            if xorshift(&mut state) % 97 == 0 {
                continue;
            }

            let level = hourly_level(machine, hour);

            // Four quarter-hour readings per hour
            for quarter in 0..4 {
                let mut value = level + jitter(&mut state) * level * 0.06;
                // Rare transmission glitch far above any plausible draw
                if xorshift(&mut state) % 211 == 0 {
                    value = level * 8.0 + 100.0;
                }
                readings.push(Reading::new(
                    hour + Duration::minutes(quarter * 15),
                    value.max(0.0),
                ));
            }
        }

        RawSeries::from_sorted(readings)
    }
}

/// Draw level for a machine at a given hour of the week
fn hourly_level(machine: &Machine, hour: DateTime<Utc>) -> f64 {
    let weekday = hour.weekday().num_days_from_monday();
    let h = chrono::Timelike::hour(&hour);

    if weekday >= 5 {
        machine.base
    } else if (6..18).contains(&h) {
        machine.production
    } else if (5..6).contains(&h) || (18..22).contains(&h) {
        machine.idle
    } else {
        machine.base
    }
}

fn xorshift(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

/// Uniform jitter in [-0.5, 0.5)
fn jitter(state: &mut u64) -> f64 {
    (xorshift(state) % 1000) as f64 / 1000.0 - 0.5
}

impl SeriesSource for SyntheticSource {
    fn fetch(&self, sensor_id: &str) -> Result<Option<RawSeries>> {
        Ok(self
            .machines
            .iter()
            .find(|m| m.id == sensor_id)
            .map(|m| self.generate(m)))
    }

    fn sensor_ids(&self) -> Vec<String> {
        self.machines.iter().map(|m| m.id.clone()).collect()
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
