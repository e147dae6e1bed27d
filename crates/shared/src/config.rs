//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Forecast defaults applied when a request omits a parameter.
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

/// Holt-Winters defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Observations per seasonal cycle.
    #[serde(default = "default_seasonality_period")]
    pub seasonality_period: usize,
    /// Level smoothing weight.
    #[serde(default = "default_alpha")]
    pub alpha: Decimal,
    /// Trend smoothing weight.
    #[serde(default = "default_beta")]
    pub beta: Decimal,
    /// Seasonal smoothing weight.
    #[serde(default = "default_gamma")]
    pub gamma: Decimal,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            seasonality_period: default_seasonality_period(),
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
        }
    }
}

fn default_seasonality_period() -> usize {
    4 // quarters per year
}

fn default_alpha() -> Decimal {
    Decimal::new(5, 1)
}

fn default_beta() -> Decimal {
    Decimal::new(3, 1)
}

fn default_gamma() -> Decimal {
    Decimal::new(2, 1)
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGETCAST").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
