use load_forecast::error::{ErrorKind, ForecastError};
use load_math::MathError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let math_error = MathError::InsufficientData("empty window".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InsufficientHistory { needed: 24, got: 10 };
    assert_eq!(
        error.to_string(),
        "Insufficient history: need at least 24 rows, got 10"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[rstest]
#[case(ForecastError::MissingColumn("datetime".into()), ErrorKind::MissingColumn)]
#[case(ForecastError::InsufficientHistory { needed: 24, got: 0 }, ErrorKind::InsufficientHistory)]
#[case(ForecastError::MalformedSeries("gap".into()), ErrorKind::MalformedSeries)]
#[case(ForecastError::ModelIncompatible("schema".into()), ErrorKind::ModelIncompatible)]
#[case(ForecastError::PredictionFailed("nan".into()), ErrorKind::PredictionFailed)]
#[case(ForecastError::MathError(MathError::InvalidInput("nan".into())), ErrorKind::PredictionFailed)]
#[case(ForecastError::DeserializationFailed("eof".into()), ErrorKind::DeserializationFailed)]
#[case(ForecastError::SerializationFailed("nan".into()), ErrorKind::SerializationFailed)]
#[case(ForecastError::InvalidParameter("depth".into()), ErrorKind::InvalidParameter)]
#[case(ForecastError::CsvError("bad row".into()), ErrorKind::Io)]
fn test_error_kind(#[case] error: ForecastError, #[case] kind: ErrorKind) {
    assert_eq!(error.kind(), kind);
}

#[test]
fn test_error_report_json() {
    let report = ForecastError::MalformedSeries("duplicate hour".to_string()).report();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(
        value,
        json!({
            "status": "failed",
            "kind": "malformed_series",
            "error": "Malformed series: duplicate hour"
        })
    );
}
