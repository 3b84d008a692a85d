//! Window statistics reported alongside a forecast

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Average, maximum and minimum of a window of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Arithmetic mean
    pub average: f64,
    /// Largest value
    pub max: f64,
    /// Smallest value
    pub min: f64,
}

impl SummaryStats {
    /// Summarize a window of values.
    ///
    /// The window must be non-empty and contain only finite values.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot summarize an empty window".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Window contains a non-finite value: {}",
                bad
            )));
        }

        let min = Statistics::min(values.iter());
        let max = Statistics::max(values.iter());
        // Rounding in the running mean can land a hair outside the extremes
        let average = Statistics::mean(values.iter()).clamp(min, max);

        Ok(Self { average, max, min })
    }

    /// Spread between the largest and smallest value
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

impl std::fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "avg {:.2} / max {:.2} / min {:.2}",
            self.average, self.max, self.min
        )
    }
}
