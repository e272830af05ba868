//! Data source module
//!
//! Abstracts over where sensor series come from. The analysis core never
//! parses files or talks to meters; it consumes series already materialized
//! in memory through the `SeriesSource` trait.

mod synthetic;

pub use synthetic::SyntheticSource;

use crate::core::{RawSeries, Result};

/// Trait for suppliers of per-sensor time series
pub trait SeriesSource {
    /// Fetch the raw series for a sensor, or `None` if the sensor is unknown
    fn fetch(&self, sensor_id: &str) -> Result<Option<RawSeries>>;

    /// Identifiers of every sensor this source can supply, in a stable order
    fn sensor_ids(&self) -> Vec<String>;

    /// Name of this source
    fn name(&self) -> &str;
}

/// In-memory series source
///
/// Holds pre-materialized series keyed by sensor identifier. Iteration order
/// follows insertion order so multi-sensor runs are deterministic.
#[derive(Debug, Default)]
pub struct MemorySource {
    sensors: Vec<(String, RawSeries)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sensor's series
    pub fn insert(&mut self, sensor_id: &str, series: RawSeries) {
        if let Some(entry) = self.sensors.iter_mut().find(|(id, _)| id == sensor_id) {
            entry.1 = series;
        } else {
            self.sensors.push((sensor_id.to_string(), series));
        }
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

impl SeriesSource for MemorySource {
    fn fetch(&self, sensor_id: &str) -> Result<Option<RawSeries>> {
        Ok(self
            .sensors
            .iter()
            .find(|(id, _)| id == sensor_id)
            .map(|(_, series)| series.clone()))
    }

    fn sensor_ids(&self) -> Vec<String> {
        self.sensors.iter().map(|(id, _)| id.clone()).collect()
    }

    fn name(&self) -> &str {
        "memory"
    }
}
