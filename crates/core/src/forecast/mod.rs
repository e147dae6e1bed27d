//! Budget forecasting: series grouping, Holt-Winters smoothing and
//! forecast-vs-actual variance.
//!
//! Data flows `HistoricalRecord` -> [`SeriesSet`] -> [`ForecastResult`] ->
//! [`VarianceResult`].

pub mod engine;
pub mod error;
pub mod holt_winters;
pub mod series;
pub mod service;
pub mod types;
pub mod variance;

#[cfg(test)]
mod tests;

pub use engine::{ForecastEngine, generate_forecast};
pub use error::ForecastError;
pub use holt_winters::{HoltWinters, HoltWintersFit};
pub use series::{SeriesSet, build_series, distinct_departments};
pub use service::ForecastService;
pub use types::{
    ForecastParams, ForecastReport, ForecastResult, ForecastStatus, GroupedSeries,
    HistoricalRecord, SeriesKey, VarianceResult, VarianceValue,
};
pub use variance::analyze_variance;
