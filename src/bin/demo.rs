//! LoadRegime Analyzer - Demo CLI
//!
//! Walks one synthetic sensor through both baseline strategies and the
//! weekly pattern analysis, printing the classified summaries.

use chrono::NaiveDate;
use loadregime_analyzer_lib::analysis::RegimeAnalyzer;
use loadregime_analyzer_lib::core::Config;
use loadregime_analyzer_lib::report::{ReportSink, TextReporter};
use loadregime_analyzer_lib::source::{SeriesSource, SyntheticSource};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("==============================================");
    println!("   LoadRegime Analyzer - Demo CLI");
    println!("==============================================\n");

    // 1. Build a synthetic data source
    println!("[1/4] Building synthetic data source...");
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).expect("valid date");
    let source = SyntheticSource::new(start, 60);
    let sensor = source.sensor_ids().remove(0);
    println!("      Source:  {}", source.name());
    println!("      Sensor:  {}", sensor);
    println!("      Span:    60 days from {}\n", start);

    let series = source
        .fetch(&sensor)?
        .expect("synthetic sensor always present");
    println!("      {} raw readings\n", series.len());

    // 2. Rolling-minimum baseline
    println!("[2/4] Classifying with the rolling-minimum baseline...\n");
    let mut rolling = Config::default();
    rolling.outlier.method = "fixed_threshold".to_string();
    rolling.outlier.max_value = 200.0;
    rolling.baseline.method = "rolling_minimum".to_string();
    rolling.baseline.window_hours = 30 * 24;

    let result = RegimeAnalyzer::new(&rolling).analyze(&series)?;
    let mut reporter = TextReporter::new(std::io::stdout().lock());
    reporter.report(&sensor, &result)?;

    // 3. Percentile baseline
    println!("[3/4] Classifying with the percentile baseline...\n");
    let mut percentile = Config::default();
    percentile.outlier.method = "iqr".to_string();
    percentile.baseline.method = "percentile".to_string();
    percentile.baseline.percentile = 10.0;
    percentile.baseline.tolerance = 0.5;

    let result = RegimeAnalyzer::new(&percentile).analyze(&series)?;
    let mut reporter = TextReporter::new(std::io::stdout().lock());
    reporter.report(&sensor, &result)?;

    // 4. Weekly pattern
    println!("[4/4] Weekly pattern analysis...\n");
    let pattern = RegimeAnalyzer::new(&percentile).analyze_pattern(&series)?;

    println!("      Mean draw, Monday 10:00:  {}", fmt(pattern.profile.mean_at(0, 10)));
    println!("      Mean draw, Sunday 03:00:  {}", fmt(pattern.profile.mean_at(6, 3)));

    let largest = pattern
        .deviations
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, d| acc.max(d.abs()));
    println!("      Largest deviation from rolling mean: {:.2} kWh", largest);

    println!("\n==============================================");
    println!("   Demo complete");
    println!("==============================================");

    Ok(())
}

fn fmt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2} kWh", v),
        None => "-".to_string(),
    }
}
