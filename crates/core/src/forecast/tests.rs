//! Property-based tests for the forecasting pipeline.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::generate_forecast;
use super::series::build_series;
use super::types::{
    ForecastParams, ForecastResult, ForecastStatus, HistoricalRecord, SeriesKey, VarianceValue,
};
use super::variance::analyze_variance;

/// Strategy for a non-negative amount with two decimal places.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn quarters() -> impl Strategy<Value = [Decimal; 4]> {
    [amount(), amount(), amount(), amount()]
}

/// Strategy for a record drawn from a small key space so that keys collide.
fn record() -> impl Strategy<Value = HistoricalRecord> {
    (
        prop::sample::select(vec!["Rent", "Travel", "Cloud"]),
        prop::sample::select(vec!["Admin", "IT"]),
        prop::sample::select(vec!["Operations", "Capital"]),
        2018i32..2026,
        quarters(),
    )
        .prop_map(|(description, department, category, year, q)| make_record(
            description,
            department,
            category,
            year,
            q,
        ))
}

fn make_record(
    description: &str,
    department: &str,
    category: &str,
    year: i32,
    q: [Decimal; 4],
) -> HistoricalRecord {
    HistoricalRecord {
        description: description.to_string(),
        justification: None,
        category: category.to_string(),
        department: department.to_string(),
        year,
        q1: q[0],
        q2: q[1],
        q3: q[2],
        q4: q[3],
        total: q[0] + q[1] + q[2] + q[3],
    }
}

fn series_of(points: usize) -> Vec<HistoricalRecord> {
    (0..points.div_ceil(4))
        .map(|i| {
            let year = 2000 + i32::try_from(i).unwrap();
            let base = Decimal::from(100 + i64::try_from(i).unwrap());
            make_record("Rent", "Admin", "Operations", year, [base; 4])
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Grouping is deterministic in content and key order.
    #[test]
    fn prop_grouping_is_deterministic(records in prop::collection::vec(record(), 0..40)) {
        let first = build_series(&records, None);
        let second = build_series(&records, None);

        prop_assert_eq!(&first, &second);
        let first_keys: Vec<&SeriesKey> = first.into_iter().map(|s| &s.key).collect();
        let second_keys: Vec<&SeriesKey> = second.into_iter().map(|s| &s.key).collect();
        prop_assert_eq!(first_keys, second_keys);
    }

    /// Each series holds four observations per contributing record.
    #[test]
    fn prop_series_length_is_four_per_record(records in prop::collection::vec(record(), 0..40)) {
        let set = build_series(&records, None);
        let total: usize = set.into_iter().map(|s| s.record_count).sum();

        prop_assert_eq!(total, records.len());
        for series in &set {
            prop_assert_eq!(series.observations.len(), 4 * series.record_count);
        }
    }

    /// One point short of two cycles is never forecast; exactly two cycles always is.
    #[test]
    fn prop_sufficiency_boundary(period in 1usize..=6) {
        let params = ForecastParams { seasonality_period: period, ..ForecastParams::default() };
        let required = 2 * period;

        let records = series_of(required);
        let set = build_series(&records, None);
        let mut series = set.as_slice()[0].clone();

        series.observations.truncate(required - 1);
        let short = super::engine::ForecastEngine::new(params).forecast_series(&series);
        prop_assert_eq!(short.status, ForecastStatus::InsufficientData);
        prop_assert_eq!(short.quarters(), [Decimal::ZERO; 4]);

        series.observations = set.as_slice()[0].observations[..required].to_vec();
        let exact = super::engine::ForecastEngine::new(params).forecast_series(&series);
        prop_assert_eq!(exact.status, ForecastStatus::Forecast);
    }

    /// The forecast total is exactly the sum of the quarters.
    #[test]
    fn prop_total_matches_quarters(records in prop::collection::vec(record(), 0..40)) {
        let set = build_series(&records, None);
        for result in generate_forecast(&set, &ForecastParams::default()) {
            let sum: Decimal = result.quarters().iter().copied().sum();
            prop_assert_eq!(result.forecasted_total, sum);
        }
    }

    /// Variance is forecast minus prior-year actual for each field.
    #[test]
    fn prop_variance_is_exact_difference(forecast_q in quarters(), actual_q in quarters()) {
        let actual = make_record("Rent", "Admin", "Operations", 2023, actual_q);
        let forecast = ForecastResult {
            description: "Rent".to_string(),
            justification: None,
            category: "Operations".to_string(),
            department: "Admin".to_string(),
            year: 2024,
            forecasted_q1: forecast_q[0],
            forecasted_q2: forecast_q[1],
            forecasted_q3: forecast_q[2],
            forecasted_q4: forecast_q[3],
            forecasted_total: forecast_q.iter().copied().sum(),
            data_points: 8,
            status: ForecastStatus::Forecast,
        };

        let result = &analyze_variance(std::slice::from_ref(&forecast), &[actual.clone()])[0];

        prop_assert_eq!(result.variance_q1, VarianceValue::Amount(forecast_q[0] - actual.q1));
        prop_assert_eq!(result.variance_q2, VarianceValue::Amount(forecast_q[1] - actual.q2));
        prop_assert_eq!(result.variance_q3, VarianceValue::Amount(forecast_q[2] - actual.q3));
        prop_assert_eq!(result.variance_q4, VarianceValue::Amount(forecast_q[3] - actual.q4));
        prop_assert_eq!(
            result.variance_total,
            VarianceValue::Amount(forecast.forecasted_total - actual.total)
        );
    }

    /// Forecasts without a prior-year record carry the sentinel, never zero.
    #[test]
    fn prop_missing_prior_year_is_sentinel(
        records in prop::collection::vec(record(), 1..20),
        gap in 2i32..5,
    ) {
        let set = build_series(&records, None);
        let mut forecasts = generate_forecast(&set, &ForecastParams::default());
        for forecast in &mut forecasts {
            forecast.year += gap;
        }

        for result in analyze_variance(&forecasts, &records) {
            let key = result.forecast.key();
            let has_prior = records
                .iter()
                .any(|r| r.matches(&key) && r.year == result.forecast.year - 1);
            if !has_prior {
                prop_assert!(result.variance_q1.is_not_applicable());
                prop_assert!(result.variance_q2.is_not_applicable());
                prop_assert!(result.variance_q3.is_not_applicable());
                prop_assert!(result.variance_q4.is_not_applicable());
                prop_assert!(result.variance_total.is_not_applicable());
            }
        }
    }
}

#[test]
fn test_strictly_positive_seasonal_series() {
    let records = vec![
        make_record(
            "Rent",
            "Admin",
            "Operations",
            2022,
            [
                Decimal::from(100),
                Decimal::from(120),
                Decimal::from(90),
                Decimal::from(110),
            ],
        ),
        make_record(
            "Rent",
            "Admin",
            "Operations",
            2023,
            [
                Decimal::from(105),
                Decimal::from(125),
                Decimal::from(95),
                Decimal::from(115),
            ],
        ),
    ];

    let results = generate_forecast(&build_series(&records, None), &ForecastParams::default());

    assert!(results[0].forecasted_total > Decimal::ZERO);
    assert!(results[0].quarters().iter().all(|q| *q >= Decimal::ZERO));
}

#[test]
fn test_single_sparse_record_is_zeroed() {
    let records = vec![make_record(
        "Travel",
        "Admin",
        "Operations",
        2023,
        [Decimal::from(50), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO],
    )];

    let results = generate_forecast(&build_series(&records, None), &ForecastParams::default());

    assert_eq!(results[0].quarters(), [Decimal::ZERO; 4]);
    assert_eq!(results[0].forecasted_total, Decimal::ZERO);
}
