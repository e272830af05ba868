//! Configuration management

use crate::core::{DateRange, Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub outlier: OutlierConfig,
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub range: RangeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            outlier: OutlierConfig::default(),
            baseline: BaselineConfig::default(),
            range: RangeConfig::default(),
        }
    }
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        let app_config_dir = config_dir.join("loadregime-analyzer");

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir)?;
        }

        Ok(app_config_dir.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Sensors to analyze (empty = every sensor the source offers)
    #[serde(default)]
    pub sensors: Vec<String>,
    /// Report format: "text" or "json"
    #[serde(default = "default_report_format")]
    pub report_format: String,
}

fn default_report_format() -> String { "text".to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            sensors: Vec::new(),
            report_format: default_report_format(),
        }
    }
}

/// Outlier filtering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierConfig {
    /// Filtering method: "iqr" or "fixed_threshold"
    #[serde(default = "default_outlier_method")]
    pub method: String,
    /// IQR multiplier for the valid range (iqr method)
    #[serde(default = "default_iqr_factor")]
    pub iqr_factor: f64,
    /// Upper bound above which readings are dropped (fixed_threshold method)
    #[serde(default = "default_max_value")]
    pub max_value: f64,
}

fn default_outlier_method() -> String { "iqr".to_string() }
fn default_iqr_factor() -> f64 { 1.5 }
fn default_max_value() -> f64 { 200.0 }

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            method: default_outlier_method(),
            iqr_factor: default_iqr_factor(),
            max_value: default_max_value(),
        }
    }
}

/// Baseline estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Estimation method: "rolling_minimum" or "percentile"
    #[serde(default = "default_baseline_method")]
    pub method: String,
    /// Trailing window in hours (rolling_minimum method)
    #[serde(default = "default_window_hours")]
    pub window_hours: usize,
    /// Percentile of the valid subset used as base load, 0-100 (percentile method)
    #[serde(default = "default_percentile")]
    pub percentile: f64,
    /// Additive tolerance on the base-load upper bound (percentile method)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Lookback in weeks for the weekly pattern analysis
    #[serde(default = "default_lookback_weeks")]
    pub lookback_weeks: usize,
}

fn default_baseline_method() -> String { "rolling_minimum".to_string() }
fn default_window_hours() -> usize { 30 * 24 }
fn default_percentile() -> f64 { 10.0 }
fn default_tolerance() -> f64 { 0.5 }
fn default_lookback_weeks() -> usize { 4 }

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            method: default_baseline_method(),
            window_hours: default_window_hours(),
            percentile: default_percentile(),
            tolerance: default_tolerance(),
            lookback_weeks: default_lookback_weeks(),
        }
    }
}

/// Date range restriction for the analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeConfig {
    /// First day to analyze (inclusive); unset = from the start of the data
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day to analyze (inclusive); unset = to the end of the data
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl RangeConfig {
    /// The configured date range, when both bounds are set
    pub fn date_range(&self) -> Result<Option<DateRange>> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Ok(Some(DateRange::new(start, end)?)),
            (None, None) => Ok(None),
            _ => Err(Error::Config(
                "start_date and end_date must be set together".to_string(),
            )),
        }
    }
}
