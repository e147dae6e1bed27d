//! Core business logic for budgetcast.
//!
//! This crate contains pure forecasting logic with ZERO web dependencies.
//!
//! # Modules
//!
//! - `forecast` - Series grouping, Holt-Winters forecasting and variance analysis

pub mod forecast;
