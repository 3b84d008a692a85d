use chrono::NaiveDateTime;
use load_forecast::data::{ColumnAliases, DataLoader, HistoricalSeries};
use load_forecast::ForecastError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[test]
fn test_data_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "datetime,actual_load").unwrap();
    writeln!(file, "2024-01-01T00:00:00,1000.5").unwrap();
    writeln!(file, "2024-01-01T01:00:00,980.0").unwrap();
    writeln!(file, "2024-01-01T02:00:00,965.25").unwrap();

    let series = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), vec![1000.5, 980.0, 965.25]);
    assert_eq!(series.last_timestamp(), Some(ts("2024-01-01T02:00:00")));
}

#[test]
fn test_csv_with_source_column_names() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "hour,actual_total_load_mw,region").unwrap();
    writeln!(file, "2024-01-01 00:00:00,700,north").unwrap();
    writeln!(file, "2024-01-01 01:00:00,710,north").unwrap();

    let series = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(series.values(), vec![700.0, 710.0]);
    assert_eq!(
        series.timestamps(),
        vec![ts("2024-01-01T00:00:00"), ts("2024-01-01T01:00:00")]
    );
}

#[test]
fn test_csv_records_keep_cell_types() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "datetime,actual_load,note").unwrap();
    writeln!(file, "2024-01-01T00:00:00,42,").unwrap();

    let records = DataLoader::read_csv_records(file.path()).unwrap();

    assert_eq!(
        records,
        vec![json!({
            "datetime": "2024-01-01T00:00:00",
            "actual_load": 42.0,
            "note": null
        })]
    );
}

#[test]
fn test_read_records_dispatches_on_extension() {
    let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(csv_file, "datetime,actual_load").unwrap();
    writeln!(csv_file, "2024-01-01T00:00:00,5").unwrap();

    let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        json_file,
        r#"[{{"datetime": "2024-01-01T00:00:00", "actual_load": 5}}]"#
    )
    .unwrap();

    let from_csv = DataLoader::read_records(csv_file.path()).unwrap();
    let from_json = DataLoader::read_records(json_file.path()).unwrap();

    let columns = ColumnAliases::default();
    assert_eq!(
        DataLoader::from_records_with(&from_csv, &columns).unwrap(),
        DataLoader::from_records_with(&from_json, &columns).unwrap()
    );
}

#[test]
fn test_records_are_sorted_by_timestamp() {
    let records = vec![
        json!({"datetime": "2024-01-01T02:00:00", "actual_load": 3.0}),
        json!({"datetime": "2024-01-01T00:00:00", "actual_load": 1.0}),
        json!({"datetime": "2024-01-01T01:00:00", "actual_load": 2.0}),
    ];

    let series = DataLoader::from_records(&records).unwrap();
    assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_unparsable_timestamp_is_dropped() {
    let records = vec![
        json!({"datetime": "2024-01-01T00:00:00", "actual_load": 1.0}),
        json!({"datetime": "not-a-date", "actual_load": 99.0}),
        json!({"datetime": "2024-01-01T01:00:00", "actual_load": 2.0}),
    ];

    let series = DataLoader::from_records(&records).unwrap();
    assert_eq!(series.values(), vec![1.0, 2.0]);
}

#[test]
fn test_numeric_string_value_is_accepted() {
    let records = vec![json!({"timestamp": "2024-01-01T00:00:00", "value": " 12.5 "})];
    let series = DataLoader::from_records(&records).unwrap();
    assert_eq!(series.values(), vec![12.5]);
}

#[rstest]
#[case(json!({"actual_load": 1.0}))]
#[case(json!({"datetime": "2024-01-01T00:00:00"}))]
#[case(json!({"datetime": "2024-01-01T00:00:00", "actual_load": null}))]
#[case(json!({"datetime": "2024-01-01T00:00:00", "actual_load": "high"}))]
#[case(json!({"datetime": "2024-01-01T00:00:00", "actual_load": "NaN"}))]
#[case(json!({"datetime": "2024-01-01T00:00:00", "actual_load": " inf "}))]
#[case(json!({"datetime": "2024-01-01T00:00:00", "actual_load": "-infinity"}))]
#[case(json!([1, 2]))]
fn test_bad_record_is_missing_column(#[case] record: Value) {
    let records = vec![
        json!({"datetime": "2024-01-01T00:00:00", "actual_load": 1.0}),
        record,
    ];

    let result = DataLoader::from_records(&records);
    assert!(matches!(result, Err(ForecastError::MissingColumn(_))));
}

#[test]
fn test_nan_csv_cell_is_missing_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "datetime,actual_load").unwrap();
    writeln!(file, "2024-01-01T00:00:00,1000").unwrap();
    writeln!(file, "2024-01-01T01:00:00,NaN").unwrap();

    let result = DataLoader::from_csv(file.path());
    assert!(matches!(result, Err(ForecastError::MissingColumn(_))));
}

#[test]
fn test_custom_aliases() {
    let columns = ColumnAliases {
        timestamp: vec!["ts".to_string()],
        value: vec!["mw".to_string()],
    };
    let records = vec![json!({"ts": "2024-06-01T12:00:00", "mw": 321})];

    let series = DataLoader::from_records_with(&records, &columns).unwrap();
    assert_eq!(series.values(), vec![321.0]);

    let default_names = DataLoader::from_records(&records);
    assert!(matches!(default_names, Err(ForecastError::MissingColumn(_))));
}

#[test]
fn test_series_slicing() {
    let timestamps: Vec<NaiveDateTime> = (0..5)
        .map(|h| ts("2024-01-01T00:00:00") + chrono::Duration::hours(h))
        .collect();
    let series = HistoricalSeries::from_parts(timestamps, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

    assert_eq!(series.slice(1, Some(3)).values(), vec![2.0, 3.0]);
    assert_eq!(series.slice(3, None).values(), vec![4.0, 5.0]);
    assert_eq!(series.slice(4, Some(99)).values(), vec![5.0]);
    assert!(series.slice(9, None).is_empty());
}

#[test]
fn test_from_parts_length_mismatch() {
    let result = HistoricalSeries::from_parts(vec![ts("2024-01-01T00:00:00")], vec![]);
    assert!(result.is_err());
}
