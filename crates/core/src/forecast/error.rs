//! Forecasting error types.

use thiserror::Error;

/// Per-series forecasting failures.
///
/// These never escape the engine: each one degrades the affected series to
/// a zeroed forecast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// Not enough observations for two full seasonal cycles.
    #[error("Insufficient data: need at least {required} data points, got {actual}")]
    InsufficientData {
        /// Observations required.
        required: usize,
        /// Observations available.
        actual: usize,
    },

    /// Seasonality period must be at least 1.
    #[error("Seasonality period must be at least 1")]
    InvalidPeriod,

    /// Decimal arithmetic overflowed or divided by zero.
    #[error("Arithmetic overflow during {stage}")]
    Overflow {
        /// Smoothing stage that failed.
        stage: &'static str,
    },
}
