//! Additive Holt-Winters triple exponential smoothing over decimals.
//!
//! ```text
//! Level:    L_t = α (x_t - S_i) + (1 - α)(L_{t-1} + T_{t-1})
//! Trend:    T_t = β (L_t - L_{t-1}) + (1 - β) T_{t-1}
//! Season:   S_i = γ (x_t - L_t) + (1 - γ) S_i
//! Forecast: F_{n-1+k} = L + k T + S_{(n-1+k) mod m}
//! ```
//!
//! with `i = t mod m`. The first cycle bootstraps the state:
//! `L_0` is its mean, `T_0` is the difference between the second and first
//! cycle means divided by `m`, and `S_i = x_i - L_0`.
//!
//! Every operation is checked. Overflow surfaces as
//! [`ForecastError::Overflow`] instead of panicking.

use rust_decimal::Decimal;

use super::error::ForecastError;
use super::types::ForecastParams;

/// Result of fitting the model to a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoltWintersFit {
    /// One-step-ahead in-sample values, one per observation.
    pub fitted: Vec<Decimal>,
    /// Out-of-sample forecasts for the next full cycle.
    pub forecast: Vec<Decimal>,
    /// Final level.
    pub level: Decimal,
    /// Final trend.
    pub trend: Decimal,
    /// Final seasonal indices by cycle position.
    pub seasonal: Vec<Decimal>,
}

impl HoltWintersFit {
    /// Fitted values followed by forecasts.
    #[must_use]
    pub fn predictions(&self) -> Vec<Decimal> {
        let mut all = Vec::with_capacity(self.fitted.len() + self.forecast.len());
        all.extend_from_slice(&self.fitted);
        all.extend_from_slice(&self.forecast);
        all
    }
}

/// Additive Holt-Winters smoother.
#[derive(Debug, Clone, Copy)]
pub struct HoltWinters {
    alpha: Decimal,
    beta: Decimal,
    gamma: Decimal,
    period: usize,
}

impl HoltWinters {
    /// Creates a smoother. Weights are taken as given.
    #[must_use]
    pub const fn new(alpha: Decimal, beta: Decimal, gamma: Decimal, period: usize) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            period,
        }
    }

    /// Creates a smoother from forecast parameters.
    #[must_use]
    pub const fn from_params(params: &ForecastParams) -> Self {
        Self::new(
            params.alpha,
            params.beta,
            params.gamma,
            params.seasonality_period,
        )
    }

    /// Fits the model and forecasts one cycle ahead.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::InvalidPeriod`] if the period is zero.
    /// - [`ForecastError::InsufficientData`] with fewer than `2 * period` points.
    /// - [`ForecastError::Overflow`] if any intermediate value overflows.
    pub fn fit(&self, data: &[Decimal]) -> Result<HoltWintersFit, ForecastError> {
        let m = self.period;
        if m == 0 {
            return Err(ForecastError::InvalidPeriod);
        }
        let n = data.len();
        let required = m.saturating_mul(2);
        if n < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: n,
            });
        }

        let period = Decimal::from(m);
        let first_mean = mean(&data[..m], "initial level")?;
        let second_mean = mean(&data[m..2 * m], "initial trend")?;

        let mut level = first_mean;
        let mut trend = sub(second_mean, first_mean, "initial trend")?;
        trend = div(trend, period, "initial trend")?;

        let mut seasonal = data[..m]
            .iter()
            .map(|&x| sub(x, level, "initial seasonal"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut fitted = Vec::with_capacity(n);
        for s in &seasonal {
            fitted.push(add(level, *s, "fitted")?);
        }

        let one_minus_alpha = sub(Decimal::ONE, self.alpha, "level")?;
        let one_minus_beta = sub(Decimal::ONE, self.beta, "trend")?;
        let one_minus_gamma = sub(Decimal::ONE, self.gamma, "seasonal")?;

        for (t, &x) in data.iter().enumerate().skip(m) {
            let i = t % m;
            let s_prev = seasonal[i];
            let projected = add(level, trend, "level")?;

            fitted.push(add(projected, s_prev, "fitted")?);

            let new_level = add(
                mul(self.alpha, sub(x, s_prev, "level")?, "level")?,
                mul(one_minus_alpha, projected, "level")?,
                "level",
            )?;
            let new_trend = add(
                mul(self.beta, sub(new_level, level, "trend")?, "trend")?,
                mul(one_minus_beta, trend, "trend")?,
                "trend",
            )?;
            seasonal[i] = add(
                mul(self.gamma, sub(x, new_level, "seasonal")?, "seasonal")?,
                mul(one_minus_gamma, s_prev, "seasonal")?,
                "seasonal",
            )?;

            level = new_level;
            trend = new_trend;
        }

        let last = n - 1;
        let mut forecast = Vec::with_capacity(m);
        for k in 1..=m {
            let steps = mul(Decimal::from(k), trend, "forecast")?;
            let base = add(level, steps, "forecast")?;
            forecast.push(add(base, seasonal[(last + k) % m], "forecast")?);
        }

        Ok(HoltWintersFit {
            fitted,
            forecast,
            level,
            trend,
            seasonal,
        })
    }
}

fn add(a: Decimal, b: Decimal, stage: &'static str) -> Result<Decimal, ForecastError> {
    a.checked_add(b).ok_or(ForecastError::Overflow { stage })
}

fn sub(a: Decimal, b: Decimal, stage: &'static str) -> Result<Decimal, ForecastError> {
    a.checked_sub(b).ok_or(ForecastError::Overflow { stage })
}

fn mul(a: Decimal, b: Decimal, stage: &'static str) -> Result<Decimal, ForecastError> {
    a.checked_mul(b).ok_or(ForecastError::Overflow { stage })
}

fn div(a: Decimal, b: Decimal, stage: &'static str) -> Result<Decimal, ForecastError> {
    a.checked_div(b).ok_or(ForecastError::Overflow { stage })
}

fn mean(values: &[Decimal], stage: &'static str) -> Result<Decimal, ForecastError> {
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, &x| add(acc, x, stage))?;
    div(sum, Decimal::from(values.len()), stage)
}
