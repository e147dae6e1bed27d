//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Smoothing defaults applied to requests that omit them.
    pub forecast_defaults: ForecastDefaultsResponse,
}

/// Configured forecast defaults.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDefaultsResponse {
    /// Observations per seasonal cycle.
    pub seasonality_period: usize,
    /// Level smoothing weight.
    pub alpha: String,
    /// Trend smoothing weight.
    pub beta: String,
    /// Seasonal smoothing weight.
    pub gamma: String,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let defaults = &state.config.forecast;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        forecast_defaults: ForecastDefaultsResponse {
            seasonality_period: defaults.seasonality_period,
            alpha: defaults.alpha.to_string(),
            beta: defaults.beta.to_string(),
            gamma: defaults.gamma.to_string(),
        },
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
