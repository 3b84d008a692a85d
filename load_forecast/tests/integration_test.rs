use load_forecast::codec::JsonCodec;
use load_forecast::utils::{generate_load_profile, write_csv, SyntheticLoad};
use load_forecast::{DataLoader, ForecastConfig, Forecaster};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_complete_workflow_through_files() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("load.csv");
    let model_path = dir.path().join("model.json");

    let series = generate_load_profile(&SyntheticLoad {
        hours: 24 * 5,
        seed: Some(11),
        ..Default::default()
    })
    .unwrap();
    write_csv(&series, &csv_path).unwrap();

    let config = ForecastConfig::from_json_str(r#"{"model": {"n_estimators": 30}}"#).unwrap();
    let forecaster = Forecaster::from_config(&config).unwrap();
    let codec = JsonCodec::new();

    // Train from CSV records, persist the model
    let records = DataLoader::read_records(&csv_path).unwrap();
    let output = forecaster.train_records(&codec, &records).unwrap();
    fs::write(&model_path, &output.model).unwrap();
    assert_eq!(output.metadata.training_rows, 24 * 4);

    // Forecast from only the last day of records with the persisted model
    let bytes = fs::read(&model_path).unwrap();
    let recent = &records[records.len() - 24..];
    let report = forecaster.forecast_records(&codec, &bytes, recent).unwrap();

    let loaded = DataLoader::from_csv(&csv_path).unwrap();
    let last = loaded.last_timestamp().unwrap();
    assert_eq!(report.past_24h_data.last().unwrap().timestamp, last);
    assert_eq!(
        report.future_24h_data.first().unwrap().timestamp,
        last + chrono::Duration::hours(1)
    );
    assert_eq!(report.future_24h_data.len(), 24);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"past_24h_data\""));
    assert!(json.contains("\"future_24h\""));
}
