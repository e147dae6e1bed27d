//! Forecast routes.
//!
//! The body of each request is the caller's historical line items as a
//! JSON array; smoothing parameters travel in the query string.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::post,
};
use budgetcast_core::forecast::{
    ForecastParams, ForecastReport, ForecastResult, ForecastService, HistoricalRecord,
    VarianceResult, VarianceValue,
};
use budgetcast_shared::{AppError, ForecastConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, error};

use crate::{AppState, error::ApiError};

/// Category assigned to line items that arrive without one.
const UNCATEGORIZED: &str = "Uncategorized";

/// Creates the forecast routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forecast/generate", post(generate_forecast))
        .route("/forecast/departments", post(list_departments))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for forecast generation.
///
/// Values are kept as raw strings so that unparseable input falls back to
/// the configured default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    /// Restrict forecasting to one department.
    pub department: Option<String>,
    /// Observations per seasonal cycle.
    pub seasonality_period: Option<String>,
    /// Level smoothing weight.
    pub alpha: Option<String>,
    /// Trend smoothing weight.
    pub beta: Option<String>,
    /// Seasonal smoothing weight.
    pub gamma: Option<String>,
}

impl ForecastQuery {
    /// Resolves smoothing parameters against configured defaults.
    #[must_use]
    pub fn params(&self, defaults: &ForecastConfig) -> ForecastParams {
        let seasonality_period = self
            .seasonality_period
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|period| *period > 0)
            .unwrap_or(defaults.seasonality_period);

        ForecastParams {
            seasonality_period,
            alpha: parse_decimal(self.alpha.as_deref(), defaults.alpha),
            beta: parse_decimal(self.beta.as_deref(), defaults.beta),
            gamma: parse_decimal(self.gamma.as_deref(), defaults.gamma),
        }
    }

    /// Department filter, if a non-blank one was given.
    ///
    /// The value is passed through untrimmed; matching is exact.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .filter(|dept| !dept.trim().is_empty())
    }
}

/// A historical line item as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalRecordInput {
    /// Line item description.
    pub description: String,
    /// Optional justification.
    #[serde(default)]
    pub justification: Option<String>,
    /// Category name; blank becomes "Uncategorized".
    #[serde(default)]
    pub category: Option<String>,
    /// Owning department.
    #[serde(default)]
    pub department: Option<String>,
    /// Budget year.
    pub year: i32,
    /// Q1 amount.
    #[serde(default)]
    pub q1: Option<Decimal>,
    /// Q2 amount.
    #[serde(default)]
    pub q2: Option<Decimal>,
    /// Q3 amount.
    #[serde(default)]
    pub q3: Option<Decimal>,
    /// Q4 amount.
    #[serde(default)]
    pub q4: Option<Decimal>,
    /// Total; computed from the quarters when absent.
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl HistoricalRecordInput {
    /// Fills defaults and produces a well-typed record.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the quarters cannot be summed.
    pub fn into_record(self) -> Result<HistoricalRecord, AppError> {
        let q1 = self.q1.unwrap_or_default();
        let q2 = self.q2.unwrap_or_default();
        let q3 = self.q3.unwrap_or_default();
        let q4 = self.q4.unwrap_or_default();

        let total = match self.total {
            Some(total) => total,
            None => [q1, q2, q3, q4]
                .iter()
                .try_fold(Decimal::ZERO, |acc, q| acc.checked_add(*q))
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "Quarterly amounts for '{}' ({}) overflow",
                        self.description, self.year
                    ))
                })?,
        };

        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Ok(HistoricalRecord {
            description: self.description,
            justification: self.justification,
            category,
            department: self.department.unwrap_or_default(),
            year: self.year,
            q1,
            q2,
            q3,
            q4,
            total,
        })
    }
}

/// Forecast response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    /// One forecast per line item series.
    pub forecasts: Vec<ForecastItemResponse>,
    /// Forecasts with prior-year variance.
    pub variance_analysis: Vec<VarianceItemResponse>,
}

/// Forecast for one series.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastItemResponse {
    /// Line item description.
    pub description: String,
    /// Justification of the latest record.
    pub justification: Option<String>,
    /// Category name.
    pub category: String,
    /// Department.
    pub department: String,
    /// Forecast year.
    pub year: i32,
    /// Forecast Q1.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecasted_q1: Decimal,
    /// Forecast Q2.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecasted_q2: Decimal,
    /// Forecast Q3.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecasted_q3: Decimal,
    /// Forecast Q4.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecasted_q4: Decimal,
    /// Forecast total.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecasted_total: Decimal,
    /// Observations the forecast used.
    pub data_points: usize,
    /// Forecast outcome.
    pub status: String,
}

/// Forecast with variance against the prior year.
///
/// Variances are numbers, or the string "N/A" when no prior-year record
/// exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceItemResponse {
    /// The forecast being compared.
    #[serde(flatten)]
    pub forecast: ForecastItemResponse,
    /// Q1 variance or "N/A".
    pub variance_q1: VarianceValue,
    /// Q2 variance or "N/A".
    pub variance_q2: VarianceValue,
    /// Q3 variance or "N/A".
    pub variance_q3: VarianceValue,
    /// Q4 variance or "N/A".
    pub variance_q4: VarianceValue,
    /// Total variance or "N/A".
    pub variance_total: VarianceValue,
}

/// Departments response.
#[derive(Debug, Serialize)]
pub struct DepartmentsResponse {
    /// Distinct departments in first-seen order.
    pub departments: Vec<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses a decimal, falling back to `default` when absent or invalid.
fn parse_decimal(raw: Option<&str>, default: Decimal) -> Decimal {
    raw.and_then(|s| Decimal::from_str(s.trim()).ok())
        .unwrap_or(default)
}

fn forecast_to_response(forecast: &ForecastResult) -> ForecastItemResponse {
    ForecastItemResponse {
        description: forecast.description.clone(),
        justification: forecast.justification.clone(),
        category: forecast.category.clone(),
        department: forecast.department.clone(),
        year: forecast.year,
        forecasted_q1: forecast.forecasted_q1,
        forecasted_q2: forecast.forecasted_q2,
        forecasted_q3: forecast.forecasted_q3,
        forecasted_q4: forecast.forecasted_q4,
        forecasted_total: forecast.forecasted_total,
        data_points: forecast.data_points,
        status: forecast.status.as_str().to_string(),
    }
}

fn variance_to_response(variance: &VarianceResult) -> VarianceItemResponse {
    VarianceItemResponse {
        forecast: forecast_to_response(&variance.forecast),
        variance_q1: variance.variance_q1,
        variance_q2: variance.variance_q2,
        variance_q3: variance.variance_q3,
        variance_q4: variance.variance_q4,
        variance_total: variance.variance_total,
    }
}

fn report_to_response(report: &ForecastReport) -> ForecastResponse {
    ForecastResponse {
        forecasts: report.forecasts.iter().map(forecast_to_response).collect(),
        variance_analysis: report
            .variance_analysis
            .iter()
            .map(variance_to_response)
            .collect(),
    }
}

/// Extracts and default-fills the submitted records.
fn parse_records(
    body: Result<Json<Vec<HistoricalRecordInput>>, JsonRejection>,
) -> Result<Vec<HistoricalRecord>, ApiError> {
    let Json(inputs) = body?;
    inputs
        .into_iter()
        .map(HistoricalRecordInput::into_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::from)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /forecast/generate
async fn generate_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
    body: Result<Json<Vec<HistoricalRecordInput>>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let records = parse_records(body)?;
    let query = query.map_or_else(
        |rejection| {
            debug!(error = %rejection.body_text(), "Unparseable query, using defaults");
            ForecastQuery::default()
        },
        |Query(query)| query,
    );
    let params = query.params(&state.config.forecast);
    let department = query.department().map(str::to_string);

    debug!(
        records = records.len(),
        department = department.as_deref().unwrap_or(""),
        seasonality_period = params.seasonality_period,
        "Forecast requested"
    );

    let report = tokio::task::spawn_blocking(move || {
        ForecastService::run(&records, department.as_deref(), &params)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Forecast task failed");
        AppError::Internal("Failed to generate forecast".to_string())
    })?;

    Ok(Json(report_to_response(&report)))
}

/// POST /forecast/departments
async fn list_departments(
    body: Result<Json<Vec<HistoricalRecordInput>>, JsonRejection>,
) -> Result<Json<DepartmentsResponse>, ApiError> {
    let records = parse_records(body)?;
    Ok(Json(DepartmentsResponse {
        departments: ForecastService::departments(&records),
    }))
}
