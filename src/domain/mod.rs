//! Core domain types and logic: return alignment, portfolio construction and
//! the metrics engine.

pub mod price_series;
pub mod return_series;
pub mod weights;
pub mod portfolio;
pub mod stats;
pub mod metrics;
pub mod rolling;
pub mod analysis;
pub mod formatting;
pub mod benchmark;
pub mod config_validation;
pub mod error;
