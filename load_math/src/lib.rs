//! # Load Math
//!
//! Numeric helpers shared by the load forecasting crates.
//! This crate provides the window statistics reported next to every
//! forecast and the error metrics used to score forecasts against actuals.

use thiserror::Error;

pub mod accuracy;
pub mod summary;

pub use accuracy::{forecast_accuracy, ForecastAccuracy};
pub use summary::SummaryStats;

/// Errors that can occur in load statistics calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for load math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::InsufficientData("empty window".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: empty window"
        );
    }
}
