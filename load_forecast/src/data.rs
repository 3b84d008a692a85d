//! Hourly observation data handling

use crate::error::{ForecastError, Result};
use crate::utils::parse_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// A single hourly measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Start of the hour the value was measured for
    pub timestamp: NaiveDateTime,
    /// Measured load
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Field names searched, in order, when reading records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    /// Candidate names of the timestamp field
    pub timestamp: Vec<String>,
    /// Candidate names of the load field
    pub value: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            timestamp: vec![
                "datetime".to_string(),
                "hour".to_string(),
                "timestamp".to_string(),
            ],
            value: vec![
                "actual_load".to_string(),
                "actual_total_load_mw".to_string(),
                "value".to_string(),
                "load".to_string(),
            ],
        }
    }
}

impl ColumnAliases {
    fn resolve<'a>(
        names: &'a [String],
        record: &'a Map<String, Value>,
    ) -> Option<(&'a str, &'a Value)> {
        names
            .iter()
            .find_map(|name| record.get(name.as_str()).map(|v| (name.as_str(), v)))
    }
}

/// Observations sorted ascending by timestamp.
///
/// The series is dense and index-addressable: "24 rows back" is a positional
/// offset, so callers must supply gap-free hourly data for lag features to
/// line up with wall-clock time. Duplicates are kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    observations: Vec<Observation>,
}

impl HistoricalSeries {
    /// Build a series, sorting observations by timestamp
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|obs| obs.timestamp);
        Self { observations }
    }

    /// Build a series from parallel timestamp and value vectors
    pub fn from_parts(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }

        Ok(Self::new(
            timestamps
                .into_iter()
                .zip(values)
                .map(|(ts, v)| Observation::new(ts, v))
                .collect(),
        ))
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Load values in timestamp order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.observations.iter().map(|obs| obs.timestamp).collect()
    }

    /// Latest timestamp in the series
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.last().map(|obs| obs.timestamp)
    }

    /// Get a slice of the data from start to end index
    pub fn slice(&self, start: usize, end: Option<usize>) -> Self {
        let end = end.unwrap_or(self.len()).min(self.len());
        let start = start.min(end);
        Self {
            observations: self.observations[start..end].to_vec(),
        }
    }
}

/// Data loader for hourly load records
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Build a series from JSON records using the default column aliases
    pub fn from_records(records: &[Value]) -> Result<HistoricalSeries> {
        Self::from_records_with(records, &ColumnAliases::default())
    }

    /// Build a series from JSON records.
    ///
    /// A record without a timestamp field, or whose load field is absent or
    /// not a finite number, rejects the whole input. Records whose timestamp does
    /// not parse are dropped.
    pub fn from_records_with(records: &[Value], columns: &ColumnAliases) -> Result<HistoricalSeries> {
        let mut observations = Vec::with_capacity(records.len());
        let mut dropped = 0usize;

        for (index, record) in records.iter().enumerate() {
            let record = record.as_object().ok_or_else(|| {
                ForecastError::MissingColumn(format!("Record {} is not an object", index))
            })?;

            let (_, raw_ts) = ColumnAliases::resolve(&columns.timestamp, record).ok_or_else(|| {
                ForecastError::MissingColumn(format!(
                    "Record {} has no timestamp field (looked for {:?})",
                    index, columns.timestamp
                ))
            })?;

            let Some(timestamp) = raw_ts.as_str().and_then(parse_timestamp) else {
                debug!(index, value = %raw_ts, "dropping record with unparsable timestamp");
                dropped += 1;
                continue;
            };

            let (value_key, raw_value) =
                ColumnAliases::resolve(&columns.value, record).ok_or_else(|| {
                    ForecastError::MissingColumn(format!(
                        "Record {} has no load field (looked for {:?})",
                        index, columns.value
                    ))
                })?;

            let value = numeric_value(raw_value).ok_or_else(|| {
                ForecastError::MissingColumn(format!(
                    "Record {} field '{}' is not a finite number: {}",
                    index, value_key, raw_value
                ))
            })?;

            observations.push(Observation::new(timestamp, value));
        }

        debug!(
            kept = observations.len(),
            dropped, "converted records to observations"
        );

        Ok(HistoricalSeries::new(observations))
    }

    /// Read a CSV file with a header row into JSON records.
    ///
    /// Cells that parse as numbers become JSON numbers, empty cells become
    /// null, and everything else stays a string.
    pub fn read_csv_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record: Map<String, Value> = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.trim().to_string(), csv_cell(cell)))
                .collect();
            records.push(Value::Object(record));
        }

        Ok(records)
    }

    /// Read a JSON file holding an array of records
    pub fn read_json_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ForecastError::MissingColumn(format!("Input is not a JSON array of records: {}", e))
        })
    }

    /// Read records from a `.csv` file or, for any other extension, a JSON file
    pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::read_csv_records(path)
        } else {
            Self::read_json_records(path)
        }
    }

    /// Load a series from a CSV file using the default column aliases
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<HistoricalSeries> {
        let records = Self::read_csv_records(path)?;
        Self::from_records(&records)
    }

    /// Load a series from a CSV or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P, columns: &ColumnAliases) -> Result<HistoricalSeries> {
        let records = Self::read_records(path)?;
        Self::from_records_with(&records, columns)
    }
}

/// Finite load value from a number or numeric string
fn numeric_value(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn csv_cell(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    cell.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}
