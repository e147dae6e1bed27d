//! Forecast-vs-prior-year variance.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::types::{ForecastResult, HistoricalRecord, SeriesKey, VarianceResult, VarianceValue};

/// Pairs each forecast with the record for the same series one year earlier.
///
/// Variance is `forecast - actual` per quarter and for the total. When no
/// prior-year record exists every variance field is
/// [`VarianceValue::NotApplicable`]. Output order matches `forecasts`.
#[must_use]
pub fn analyze_variance(
    forecasts: &[ForecastResult],
    historical: &[HistoricalRecord],
) -> Vec<VarianceResult> {
    let mut prior: HashMap<(SeriesKey, i32), &HistoricalRecord> = HashMap::new();
    for record in historical {
        prior.entry((record.key(), record.year)).or_insert(record);
    }

    forecasts
        .iter()
        .map(|forecast| {
            let lookup = (forecast.key(), forecast.year.saturating_sub(1));
            match prior.get(&lookup) {
                Some(actual) => compare(forecast, actual),
                None => not_applicable(forecast),
            }
        })
        .collect()
}

fn compare(forecast: &ForecastResult, actual: &HistoricalRecord) -> VarianceResult {
    VarianceResult {
        forecast: forecast.clone(),
        variance_q1: delta(forecast.forecasted_q1, actual.q1),
        variance_q2: delta(forecast.forecasted_q2, actual.q2),
        variance_q3: delta(forecast.forecasted_q3, actual.q3),
        variance_q4: delta(forecast.forecasted_q4, actual.q4),
        variance_total: delta(forecast.forecasted_total, actual.total),
    }
}

fn not_applicable(forecast: &ForecastResult) -> VarianceResult {
    VarianceResult {
        forecast: forecast.clone(),
        variance_q1: VarianceValue::NotApplicable,
        variance_q2: VarianceValue::NotApplicable,
        variance_q3: VarianceValue::NotApplicable,
        variance_q4: VarianceValue::NotApplicable,
        variance_total: VarianceValue::NotApplicable,
    }
}

fn delta(forecast: Decimal, actual: Decimal) -> VarianceValue {
    forecast
        .checked_sub(actual)
        .map_or(VarianceValue::NotApplicable, VarianceValue::Amount)
}
