//! Forecast output assembled for callers

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::utils::hourly_timestamp;
use chrono::NaiveDateTime;
use load_math::SummaryStats;
use serde::{Deserialize, Serialize};

/// Whether a point was observed or forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Actual,
    Predicted,
}

/// An observed hour from the recent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualPoint {
    #[serde(with = "hourly_timestamp")]
    pub timestamp: NaiveDateTime,
    pub actual_value: f64,
    pub kind: PointKind,
}

/// A forecast hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedPoint {
    #[serde(with = "hourly_timestamp")]
    pub timestamp: NaiveDateTime,
    pub predicted_value: f64,
    pub kind: PointKind,
}

/// Summaries of the observed and forecast windows, computed independently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub past_24h: SummaryStats,
    pub future_24h: SummaryStats,
}

/// Result of a forecast call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub past_24h_data: Vec<ActualPoint>,
    pub future_24h_data: Vec<PredictedPoint>,
    pub statistics: WindowStatistics,
}

impl ForecastReport {
    /// Pair forecast timestamps with predictions and summarize both windows
    pub fn assemble(
        history: &[Observation],
        timestamps: &[NaiveDateTime],
        predictions: &[f64],
    ) -> Result<Self> {
        if timestamps.len() != predictions.len() {
            return Err(ForecastError::PredictionFailed(format!(
                "Model returned {} predictions for {} hours",
                predictions.len(),
                timestamps.len()
            )));
        }

        let past_values: Vec<f64> = history.iter().map(|obs| obs.value).collect();
        let statistics = WindowStatistics {
            past_24h: SummaryStats::from_values(&past_values)?,
            future_24h: SummaryStats::from_values(predictions)?,
        };

        let past_24h_data = history
            .iter()
            .map(|obs| ActualPoint {
                timestamp: obs.timestamp,
                actual_value: obs.value,
                kind: PointKind::Actual,
            })
            .collect();

        let future_24h_data = timestamps
            .iter()
            .zip(predictions)
            .map(|(&timestamp, &predicted_value)| PredictedPoint {
                timestamp,
                predicted_value,
                kind: PointKind::Predicted,
            })
            .collect();

        Ok(Self {
            past_24h_data,
            future_24h_data,
            statistics,
        })
    }

    /// Forecast values in timestamp order
    pub fn predicted_values(&self) -> Vec<f64> {
        self.future_24h_data
            .iter()
            .map(|p| p.predicted_value)
            .collect()
    }

    pub fn future_timestamps(&self) -> Vec<NaiveDateTime> {
        self.future_24h_data.iter().map(|p| p.timestamp).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::SerializationFailed(e.to_string()))
    }
}
