//! Forecasting data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Identity of a budget line item time series.
///
/// Two records with equal keys feed the same series regardless of year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Line item description.
    pub description: String,
    /// Owning department.
    pub department: String,
    /// Category display name.
    pub category: String,
}

impl SeriesKey {
    /// Creates a new series key.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        department: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            department: department.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.description, self.department, self.category
        )
    }
}

/// One historical budget line item with its quarterly allocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Line item description.
    pub description: String,
    /// Optional justification text.
    pub justification: Option<String>,
    /// Category display name.
    pub category: String,
    /// Owning department.
    pub department: String,
    /// Budget year.
    pub year: i32,
    /// Q1 amount.
    pub q1: Decimal,
    /// Q2 amount.
    pub q2: Decimal,
    /// Q3 amount.
    pub q3: Decimal,
    /// Q4 amount.
    pub q4: Decimal,
    /// Sum of the four quarters, as supplied upstream.
    pub total: Decimal,
}

impl HistoricalRecord {
    /// Returns the series this record belongs to.
    #[must_use]
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(&self.description, &self.department, &self.category)
    }

    /// Returns the quarters in chronological order.
    #[must_use]
    pub const fn quarters(&self) -> [Decimal; 4] {
        [self.q1, self.q2, self.q3, self.q4]
    }

    /// Returns true if this record belongs to `key`.
    #[must_use]
    pub fn matches(&self, key: &SeriesKey) -> bool {
        self.description == key.description
            && self.department == key.department
            && self.category == key.category
    }
}

/// A grouped time series built from one or more historical records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedSeries {
    /// Series identity.
    pub key: SeriesKey,
    /// Justification of the last record seen for this key.
    pub justification: Option<String>,
    /// Latest year among contributing records.
    pub last_year: i32,
    /// Number of contributing records.
    pub record_count: usize,
    /// Concatenated quarterly observations, four per record.
    pub observations: Vec<Decimal>,
}

/// Holt-Winters tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Observations per seasonal cycle.
    pub seasonality_period: usize,
    /// Level smoothing weight.
    pub alpha: Decimal,
    /// Trend smoothing weight.
    pub beta: Decimal,
    /// Seasonal smoothing weight.
    pub gamma: Decimal,
}

impl ForecastParams {
    /// Minimum observations a series needs before smoothing is attempted.
    #[must_use]
    pub const fn min_observations(&self) -> usize {
        self.seasonality_period.saturating_mul(2)
    }
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            seasonality_period: 4,
            alpha: Decimal::new(5, 1),
            beta: Decimal::new(3, 1),
            gamma: Decimal::new(2, 1),
        }
    }
}

/// Outcome of forecasting a single series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    /// Smoothing ran and produced a forecast.
    Forecast,
    /// Fewer than two full seasonal cycles were available.
    InsufficientData,
    /// Smoothing failed numerically.
    ComputationFault,
}

impl ForecastStatus {
    /// Returns the status as its serialized string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::InsufficientData => "insufficient_data",
            Self::ComputationFault => "computation_fault",
        }
    }
}

/// Next-year forecast for one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Line item description.
    pub description: String,
    /// Justification carried from the series.
    pub justification: Option<String>,
    /// Category display name.
    pub category: String,
    /// Owning department.
    pub department: String,
    /// Forecast year (last contributing year + 1).
    pub year: i32,
    /// Forecast Q1.
    pub forecasted_q1: Decimal,
    /// Forecast Q2.
    pub forecasted_q2: Decimal,
    /// Forecast Q3.
    pub forecasted_q3: Decimal,
    /// Forecast Q4.
    pub forecasted_q4: Decimal,
    /// Sum of the four forecast quarters.
    pub forecasted_total: Decimal,
    /// Number of observations the forecast was based on.
    pub data_points: usize,
    /// How the forecast was obtained.
    pub status: ForecastStatus,
}

impl ForecastResult {
    /// Returns the series key of this forecast.
    #[must_use]
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(&self.description, &self.department, &self.category)
    }

    /// Returns the forecast quarters in order.
    #[must_use]
    pub const fn quarters(&self) -> [Decimal; 4] {
        [
            self.forecasted_q1,
            self.forecasted_q2,
            self.forecasted_q3,
            self.forecasted_q4,
        ]
    }
}

/// A variance figure, or a marker that no comparison was possible.
///
/// Serializes as a number, or as the string `"N/A"` for the marker, so the
/// two are distinguishable by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceValue {
    /// Forecast minus prior-year actual.
    Amount(Decimal),
    /// No prior-year record to compare against.
    NotApplicable,
}

impl VarianceValue {
    /// Sentinel text for [`VarianceValue::NotApplicable`].
    pub const NOT_APPLICABLE: &'static str = "N/A";

    /// Returns the amount, if any.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(value) => Some(*value),
            Self::NotApplicable => None,
        }
    }

    /// Returns true if this is the "not applicable" sentinel.
    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl fmt::Display for VarianceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(value) => write!(f, "{value:.4}"),
            Self::NotApplicable => f.write_str(Self::NOT_APPLICABLE),
        }
    }
}

impl Serialize for VarianceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(value) => rust_decimal::serde::float::serialize(value, serializer),
            Self::NotApplicable => serializer.serialize_str(Self::NOT_APPLICABLE),
        }
    }
}

/// A forecast annotated with its variance against the prior year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceResult {
    /// The underlying forecast.
    #[serde(flatten)]
    pub forecast: ForecastResult,
    /// Q1 variance.
    pub variance_q1: VarianceValue,
    /// Q2 variance.
    pub variance_q2: VarianceValue,
    /// Q3 variance.
    pub variance_q3: VarianceValue,
    /// Q4 variance.
    pub variance_q4: VarianceValue,
    /// Total variance.
    pub variance_total: VarianceValue,
}

/// Output of a full forecasting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    /// One forecast per series, in first-encounter order.
    pub forecasts: Vec<ForecastResult>,
    /// Forecasts paired with prior-year variance.
    pub variance_analysis: Vec<VarianceResult>,
}
