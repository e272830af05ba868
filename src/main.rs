//! LoadRegime Analyzer - Main entry point
//!
//! Classifies per-sensor energy consumption into operational regimes
//! (base load, idle, production) and prints a per-sensor report.

use anyhow::Context;
use chrono::NaiveDate;
use loadregime_analyzer_lib::analysis::RegimeAnalyzer;
use loadregime_analyzer_lib::core::Config;
use loadregime_analyzer_lib::report::{JsonReporter, ReportSink, TextReporter};
use loadregime_analyzer_lib::source::{SeriesSource, SyntheticSource};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Could not load configuration ({}), using defaults", e);
            Config::default()
        }
    };

    let analyzer = RegimeAnalyzer::new(&config);

    // Demo data source; a metering backend would slot in behind the same
    // SeriesSource trait.
    let (start, days) = coverage(&config)?;
    let source = SyntheticSource::new(start, days);
    log::info!(
        "Analyzing {} sensor(s) from source '{}'",
        if config.general.sensors.is_empty() {
            source.sensor_ids().len()
        } else {
            config.general.sensors.len()
        },
        source.name()
    );

    let results = analyzer
        .analyze_all(&source, &config.general.sensors)
        .context("analysis failed")?;

    let stdout = std::io::stdout();
    match config.general.report_format.as_str() {
        "json" => {
            let mut reporter = JsonReporter::new(stdout.lock());
            for (sensor, result) in &results {
                reporter.report(sensor, result)?;
            }
        }
        _ => {
            let mut reporter = TextReporter::new(stdout.lock());
            for (sensor, result) in &results {
                reporter.report(sensor, result)?;
            }
        }
    }

    Ok(())
}

/// Span the synthetic source should cover: the configured date range, or a
/// default two-month window
fn coverage(config: &Config) -> anyhow::Result<(NaiveDate, u32)> {
    match config.range.date_range()? {
        Some(range) => {
            let days = (range.end - range.start).num_days() + 1;
            Ok((range.start, days as u32))
        }
        None => {
            let start = NaiveDate::from_ymd_opt(2023, 3, 1)
                .context("invalid default start date")?;
            Ok((start, 60))
        }
    }
}
