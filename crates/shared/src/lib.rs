//! Shared configuration and error types for budgetcast.
//!
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, ForecastConfig, ServerConfig};
pub use error::AppError;
