//! Error types for the load_forecast crate

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custom error types for the load_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required field is absent or cannot be read
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Not enough usable observations for the requested operation
    #[error("Insufficient history: need at least {needed} rows, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// The series is not hourly-spaced where a lag or window requires it
    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    /// The model was fitted on a different feature schema
    #[error("Model incompatible: {0}")]
    ModelIncompatible(String),

    /// Numeric failure during inference
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// The model payload could not be decoded
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// The model or report could not be encoded
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from window statistics or accuracy metrics
    #[error("Math error: {0}")]
    MathError(#[from] load_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

/// Failure category reported to callers at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingColumn,
    InsufficientHistory,
    MalformedSeries,
    ModelIncompatible,
    PredictionFailed,
    DeserializationFailed,
    SerializationFailed,
    InvalidParameter,
    Io,
}

impl ForecastError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::MissingColumn(_) => ErrorKind::MissingColumn,
            ForecastError::InsufficientHistory { .. } => ErrorKind::InsufficientHistory,
            ForecastError::MalformedSeries(_) => ErrorKind::MalformedSeries,
            ForecastError::ModelIncompatible(_) => ErrorKind::ModelIncompatible,
            ForecastError::PredictionFailed(_) | ForecastError::MathError(_) => {
                ErrorKind::PredictionFailed
            }
            ForecastError::DeserializationFailed(_) => ErrorKind::DeserializationFailed,
            ForecastError::SerializationFailed(_) => ErrorKind::SerializationFailed,
            ForecastError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            ForecastError::IoError(_) | ForecastError::CsvError(_) => ErrorKind::Io,
        }
    }

    /// Serializable form of this error
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status: "failed".to_string(),
            kind: self.kind(),
            error: self.to_string(),
        }
    }
}

/// Failure payload returned to callers instead of a partial result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub status: String,
    pub kind: ErrorKind,
    pub error: String,
}
