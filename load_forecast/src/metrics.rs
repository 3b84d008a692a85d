//! Metrics for evaluating forecast performance

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::features::{HORIZON, LAG_HOURS};
use crate::forecaster::Forecaster;
use crate::models::Regressor;
use crate::utils::train_test_split;
use load_math::{forecast_accuracy, ForecastAccuracy};
use serde::Serialize;
use tracing::info;

/// Outcome of forecasting a withheld final day
#[derive(Debug, Clone, Serialize)]
pub struct HoldoutEvaluation {
    /// Error metrics of the forecast against the withheld values
    pub accuracy: ForecastAccuracy,
    /// Withheld observed values
    pub actual: Vec<f64>,
    /// Forecast for the withheld hours
    pub predicted: Vec<f64>,
    /// Rows the model was trained on
    pub training_rows: usize,
}

impl std::fmt::Display for HoldoutEvaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Holdout over {} hours", self.actual.len())?;
        writeln!(f, "  Training rows: {}", self.training_rows)?;
        write!(f, "{}", self.accuracy)
    }
}

/// Train on all but the last 24 observations and score the forecast for them.
///
/// Needs `LAG_HOURS + 1 + HORIZON` observations so the prefix can both
/// train and seed the forecast window.
pub fn evaluate_holdout<R: Regressor>(
    forecaster: &Forecaster<R>,
    series: &HistoricalSeries,
) -> Result<HoldoutEvaluation> {
    let needed = LAG_HOURS + 1 + HORIZON;
    if series.len() < needed {
        return Err(ForecastError::InsufficientHistory {
            needed,
            got: series.len(),
        });
    }

    let (train, test) = train_test_split(series, HORIZON);
    let trained = forecaster.train(&train)?;
    let report = forecaster.forecast(&trained.model, &train)?;

    let predicted = report.predicted_values();
    let actual = test.values();
    let accuracy = forecast_accuracy(&predicted, &actual)?;

    info!(
        mae = accuracy.mae,
        rmse = accuracy.rmse,
        mape = accuracy.mape,
        "holdout evaluation finished"
    );

    Ok(HoldoutEvaluation {
        accuracy,
        actual,
        predicted,
        training_rows: trained.metadata.training_rows,
    })
}
