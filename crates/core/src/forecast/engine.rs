//! Forecast engine: runs Holt-Winters over every grouped series.

use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use super::error::ForecastError;
use super::holt_winters::HoltWinters;
use super::series::SeriesSet;
use super::types::{ForecastParams, ForecastResult, ForecastStatus, GroupedSeries};

/// Decimal places kept on forecast quarters.
const FORECAST_SCALE: u32 = 4;

/// Engine producing next-year quarterly forecasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine {
    params: ForecastParams,
}

impl ForecastEngine {
    /// Creates an engine with the given parameters.
    #[must_use]
    pub const fn new(params: ForecastParams) -> Self {
        Self { params }
    }

    /// Forecasts every series.
    ///
    /// Series are processed in parallel; the output keeps the set's
    /// first-encounter order. A series that cannot be forecast yields a
    /// zeroed result instead of failing the run.
    #[must_use]
    pub fn generate(&self, series: &SeriesSet) -> Vec<ForecastResult> {
        debug!(
            series = series.len(),
            seasonality_period = self.params.seasonality_period,
            alpha = %self.params.alpha,
            beta = %self.params.beta,
            gamma = %self.params.gamma,
            "Generating Holt-Winters forecasts"
        );

        series
            .as_slice()
            .par_iter()
            .map(|s| self.forecast_series(s))
            .collect()
    }

    /// Forecasts a single series, degrading to zeros on failure.
    #[must_use]
    pub fn forecast_series(&self, series: &GroupedSeries) -> ForecastResult {
        let actual = series.observations.len();
        let required = self.params.min_observations();

        if actual < required {
            warn!(
                key = %series.key,
                required,
                actual,
                "Insufficient data for Holt-Winters, need two full seasonal cycles"
            );
            return zeroed(series, ForecastStatus::InsufficientData);
        }

        match self.quarters(&series.observations) {
            Ok(quarters) => {
                debug!(key = %series.key, ?quarters, "Forecast generated");
                build_result(series, quarters, ForecastStatus::Forecast)
            }
            Err(ForecastError::InsufficientData { required, actual }) => {
                warn!(key = %series.key, required, actual, "Insufficient data for Holt-Winters");
                zeroed(series, ForecastStatus::InsufficientData)
            }
            Err(e) => {
                error!(key = %series.key, error = %e, "Forecast computation failed");
                zeroed(series, ForecastStatus::ComputationFault)
            }
        }
    }

    /// Runs the smoother and picks the four forecast quarters.
    ///
    /// The forecast is the trailing `seasonality_period` entries of
    /// fitted-plus-forecast; quarters beyond that are zero.
    fn quarters(&self, observations: &[Decimal]) -> Result<[Decimal; 4], ForecastError> {
        let fit = HoltWinters::from_params(&self.params).fit(observations)?;
        let predictions = fit.predictions();
        let start = predictions
            .len()
            .saturating_sub(self.params.seasonality_period);
        let trailing = &predictions[start..];

        let mut quarters = [Decimal::ZERO; 4];
        for (slot, value) in quarters.iter_mut().zip(trailing) {
            *slot = value.round_dp(FORECAST_SCALE);
        }
        Ok(quarters)
    }
}

/// Forecasts every series with the given parameters.
#[must_use]
pub fn generate_forecast(series: &SeriesSet, params: &ForecastParams) -> Vec<ForecastResult> {
    ForecastEngine::new(*params).generate(series)
}

fn zeroed(series: &GroupedSeries, status: ForecastStatus) -> ForecastResult {
    build_result(series, [Decimal::ZERO; 4], status)
}

fn build_result(
    series: &GroupedSeries,
    quarters: [Decimal; 4],
    status: ForecastStatus,
) -> ForecastResult {
    let Some(total) = quarters
        .iter()
        .try_fold(Decimal::ZERO, |acc, q| acc.checked_add(*q))
    else {
        error!(key = %series.key, "Forecast total overflowed");
        return zeroed(series, ForecastStatus::ComputationFault);
    };
    let [q1, q2, q3, q4] = quarters;

    ForecastResult {
        description: series.key.description.clone(),
        justification: series.justification.clone(),
        category: series.key.category.clone(),
        department: series.key.department.clone(),
        year: series.last_year.saturating_add(1),
        forecasted_q1: q1,
        forecasted_q2: q2,
        forecasted_q3: q3,
        forecasted_q4: q4,
        forecasted_total: total,
        data_points: series.observations.len(),
        status,
    }
}
