//! End-to-end forecasting pipeline.

use tracing::info;

use super::engine::ForecastEngine;
use super::series::{build_series, department_matches, distinct_departments};
use super::types::{ForecastParams, ForecastReport, HistoricalRecord};
use super::variance::analyze_variance;

/// Forecasting service combining grouping, smoothing and variance.
pub struct ForecastService;

impl ForecastService {
    /// Runs the full pipeline over request-scoped records.
    ///
    /// `department`, when non-empty, restricts both the series and the
    /// records used for variance comparison.
    #[must_use]
    pub fn run(
        records: &[HistoricalRecord],
        department: Option<&str>,
        params: &ForecastParams,
    ) -> ForecastReport {
        let scoped: Vec<HistoricalRecord> = records
            .iter()
            .filter(|record| department_matches(record, department))
            .cloned()
            .collect();

        let series = build_series(&scoped, None);
        let forecasts = ForecastEngine::new(*params).generate(&series);
        let variance_analysis = analyze_variance(&forecasts, &scoped);

        info!(
            records = records.len(),
            scoped = scoped.len(),
            series = series.len(),
            department = department.unwrap_or(""),
            "Forecast run complete"
        );

        ForecastReport {
            forecasts,
            variance_analysis,
        }
    }

    /// Departments present in the records.
    #[must_use]
    pub fn departments(records: &[HistoricalRecord]) -> Vec<String> {
        distinct_departments(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::types::{ForecastStatus, VarianceValue};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(description: &str, department: &str, year: i32, q: [Decimal; 4]) -> HistoricalRecord {
        HistoricalRecord {
            description: description.to_string(),
            justification: Some("Recurring".to_string()),
            category: "Operations".to_string(),
            department: department.to_string(),
            year,
            q1: q[0],
            q2: q[1],
            q3: q[2],
            q4: q[3],
            total: q[0] + q[1] + q[2] + q[3],
        }
    }

    fn sample() -> Vec<HistoricalRecord> {
        vec![
            record("Rent", "Admin", 2022, [dec!(100), dec!(120), dec!(90), dec!(110)]),
            record("Cloud", "IT", 2023, [dec!(10), dec!(10), dec!(10), dec!(10)]),
            record("Rent", "Admin", 2023, [dec!(105), dec!(125), dec!(95), dec!(115)]),
        ]
    }

    #[test]
    fn test_run_full_pipeline() {
        let report = ForecastService::run(&sample(), None, &ForecastParams::default());

        assert_eq!(report.forecasts.len(), 2);
        assert_eq!(report.variance_analysis.len(), 2);

        let rent = &report.variance_analysis[0];
        assert_eq!(rent.forecast.status, ForecastStatus::Forecast);
        assert_eq!(rent.forecast.year, 2024);
        assert_eq!(
            rent.variance_total,
            VarianceValue::Amount(rent.forecast.forecasted_total - dec!(440))
        );

        let cloud = &report.variance_analysis[1];
        assert_eq!(cloud.forecast.status, ForecastStatus::InsufficientData);
        assert_eq!(cloud.forecast.year, 2024);
        assert_eq!(cloud.variance_q1, VarianceValue::Amount(dec!(-10)));
    }

    #[test]
    fn test_run_with_department() {
        let report = ForecastService::run(&sample(), Some("IT"), &ForecastParams::default());

        assert_eq!(report.forecasts.len(), 1);
        assert_eq!(report.forecasts[0].department, "IT");
    }

    #[test]
    fn test_run_empty() {
        let report = ForecastService::run(&[], None, &ForecastParams::default());
        assert!(report.forecasts.is_empty());
        assert!(report.variance_analysis.is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let report = ForecastService::run(&sample(), None, &ForecastParams::default());
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["forecasts"].is_array());
        assert!(json["varianceAnalysis"].is_array());
        assert_eq!(json["forecasts"][1]["status"], "insufficient_data");
        assert!(json["forecasts"][0].get("forecastedTotal").is_some());
    }

    #[test]
    fn test_departments() {
        assert_eq!(ForecastService::departments(&sample()), vec!["Admin", "IT"]);
    }
}
