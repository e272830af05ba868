//! Reporting module
//!
//! Aggregates a labeled series into per-regime statistics and hands
//! complete results to pluggable sinks. The analysis core makes no
//! assumption about display format; a sink decides how to render.

use crate::core::{
    AnalysisResult, Error, HourlySeries, LevelSeries, Regime, RegimeSummary, Result,
};
use serde::Serialize;
use std::io::Write;

/// Compute the per-regime summary for a labeled series
///
/// Each regime's mean covers exactly the values carrying that label;
/// regimes with zero members get an undefined mean, which is expected for
/// short or atypical ranges and not an error.
pub fn summarize(
    hourly: &HourlySeries,
    labels: &[Regime],
    baseline: &LevelSeries,
    threshold: &LevelSeries,
) -> RegimeSummary {
    let mut sums = [0.0_f64; 4];
    let mut counts = [0_usize; 4];
    let mut missing = 0_usize;

    for (value, label) in hourly.values().iter().zip(labels) {
        let bucket = match label {
            Regime::BaseLoad => 0,
            Regime::Idle => 1,
            Regime::Production => 2,
            Regime::NoConsumption => 3,
            Regime::Missing => {
                missing += 1;
                continue;
            }
        };
        if let Some(v) = value {
            sums[bucket] += v;
            counts[bucket] += 1;
        }
    }

    let mean = |bucket: usize| {
        if counts[bucket] == 0 {
            None
        } else {
            Some(sums[bucket] / counts[bucket] as f64)
        }
    };

    RegimeSummary {
        baseline_level: baseline.level(),
        idle_threshold: threshold.level(),
        mean_base_load: mean(0),
        mean_idle: mean(1),
        mean_production: mean(2),
        mean_no_consumption: mean(3),
        base_load_hours: counts[0],
        idle_hours: counts[1],
        production_hours: counts[2],
        no_consumption_hours: counts[3],
        missing_hours: missing,
    }
}

/// Trait for consumers of per-sensor analysis results
pub trait ReportSink {
    /// Receive one sensor's complete analysis
    fn report(&mut self, sensor_id: &str, result: &AnalysisResult) -> Result<()>;
}

/// Plain-text reporter writing an aligned summary table per sensor
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn fmt_kwh(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

impl<W: Write> ReportSink for TextReporter<W> {
    fn report(&mut self, sensor_id: &str, result: &AnalysisResult) -> Result<()> {
        let summary = &result.summary;

        writeln!(self.out, "==============================================")?;
        writeln!(self.out, "  Sensor: {}", sensor_id)?;
        writeln!(self.out, "----------------------------------------------")?;

        if result.is_empty() {
            writeln!(self.out, "  No data in the requested range")?;
            writeln!(self.out)?;
            return Ok(());
        }

        writeln!(self.out, "  Regime          |  Hours  |  Mean (kWh)")?;
        writeln!(self.out, "----------------------------------------------")?;
        let rows = [
            ("base_load", summary.base_load_hours, summary.mean_base_load),
            ("idle", summary.idle_hours, summary.mean_idle),
            ("production", summary.production_hours, summary.mean_production),
            (
                "no_consumption",
                summary.no_consumption_hours,
                summary.mean_no_consumption,
            ),
            ("missing", summary.missing_hours, None),
        ];
        for (name, hours, mean) in rows {
            writeln!(
                self.out,
                "  {:<15} | {:>6}  | {:>10}",
                name,
                hours,
                fmt_kwh(mean)
            )?;
        }
        writeln!(self.out, "----------------------------------------------")?;
        writeln!(
            self.out,
            "  Baseline level: {} kWh",
            fmt_kwh(summary.baseline_level)
        )?;
        writeln!(
            self.out,
            "  Idle threshold: {} kWh",
            fmt_kwh(summary.idle_threshold)
        )?;
        writeln!(self.out)?;

        Ok(())
    }
}

/// JSON reporter emitting one document per sensor
pub struct JsonReporter<W: Write> {
    out: W,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    sensor: &'a str,
    analysis: &'a AnalysisResult,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReporter<W> {
    fn report(&mut self, sensor_id: &str, result: &AnalysisResult) -> Result<()> {
        let report = JsonReport {
            sensor: sensor_id,
            analysis: result,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn labeled_series() -> (HourlySeries, Vec<Regime>) {
        let start = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let hourly = HourlySeries::new(
            start,
            vec![Some(9.0), Some(10.0), Some(12.0), None, Some(0.0)],
        )
        .unwrap();
        let labels = vec![
            Regime::BaseLoad,
            Regime::Idle,
            Regime::Production,
            Regime::Missing,
            Regime::NoConsumption,
        ];
        (hourly, labels)
    }

    #[test]
    fn test_summarize_means_per_regime() {
        let (hourly, labels) = labeled_series();
        let baseline = LevelSeries::Scalar(Some(9.0));
        let threshold = LevelSeries::Scalar(Some(10.5));

        let summary = summarize(&hourly, &labels, &baseline, &threshold);

        assert_eq!(summary.mean_base_load, Some(9.0));
        assert_eq!(summary.mean_idle, Some(10.0));
        assert_eq!(summary.mean_production, Some(12.0));
        assert_eq!(summary.mean_no_consumption, Some(0.0));
        assert_eq!(summary.missing_hours, 1);
        assert_eq!(summary.baseline_level, Some(9.0));
        assert_eq!(summary.idle_threshold, Some(10.5));
    }

    #[test]
    fn test_summarize_empty_regime_has_undefined_mean() {
        let start = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let hourly = HourlySeries::new(start, vec![Some(9.0)]).unwrap();
        let labels = vec![Regime::BaseLoad];

        let summary = summarize(
            &hourly,
            &labels,
            &LevelSeries::Scalar(Some(9.0)),
            &LevelSeries::Scalar(Some(10.0)),
        );

        assert_eq!(summary.mean_idle, None);
        assert_eq!(summary.mean_production, None);
        assert_eq!(summary.idle_hours, 0);
    }

    #[test]
    fn test_text_reporter_renders_table() {
        let (hourly, labels) = labeled_series();
        let baseline = LevelSeries::Scalar(Some(9.0));
        let threshold = LevelSeries::Scalar(Some(10.5));
        let summary = summarize(&hourly, &labels, &baseline, &threshold);
        let result = AnalysisResult {
            hourly,
            labels,
            baseline,
            threshold,
            summary,
        };

        let mut reporter = TextReporter::new(Vec::new());
        reporter.report("3250 - Press (kWh)", &result).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(output.contains("3250 - Press (kWh)"));
        assert!(output.contains("base_load"));
        assert!(output.contains("Baseline level: 9.00 kWh"));
    }

    #[test]
    fn test_text_reporter_handles_empty_result() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.report("unknown", &AnalysisResult::empty()).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(output.contains("No data"));
    }

    #[test]
    fn test_json_reporter_emits_valid_document() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report("press", &AnalysisResult::empty()).unwrap();
        let output = reporter.into_inner();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["sensor"], "press");
        assert!(parsed["analysis"]["summary"]["baseline_level"].is_null());
    }
}
