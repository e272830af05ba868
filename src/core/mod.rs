//! Core module - configuration, errors, and common types

mod config;
mod error;
mod types;

pub use config::{BaselineConfig, Config, GeneralConfig, OutlierConfig, RangeConfig};
pub use error::{Error, Result};
pub use types::{
    AnalysisResult, DateRange, HourlySeries, LevelSeries, RawSeries, Reading, Regime,
    RegimeSummary,
};
