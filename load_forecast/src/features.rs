//! Calendar and lag feature construction
//!
//! Every row carries the same four features, in this order:
//! `hour_of_day`, `day_of_week` (Monday = 0), `month` and `lag_24`, the load
//! observed 24 rows earlier. Historical mode reads the lag straight from the
//! series; future mode has no observed lag for the next 24 hours and borrows
//! the values of the most recent 24 hours instead, so future hour `i` is
//! paired with the `i`-th of the last 24 observations.

use crate::data::{HistoricalSeries, Observation};
use crate::error::{ForecastError, Result};
use crate::utils::{format_timestamp, future_timestamps};
use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of rows between an observation and its lag feature
pub const LAG_HOURS: usize = 24;

/// Number of hours forecast per call. Must equal `LAG_HOURS`.
pub const HORIZON: usize = 24;

/// Ordered feature names shared by training and forecasting
pub const FEATURE_NAMES: [&str; 4] = ["hour_of_day", "day_of_week", "month", "lag_24"];

/// How strictly hourly spacing is enforced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingPolicy {
    /// Lag pairs and the recent window must be exactly hourly
    #[default]
    Strict,
    /// Use positional offsets as-is and only log misalignment
    Lenient,
}

/// Features for one hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub timestamp: NaiveDateTime,
    pub hour_of_day: u32,
    pub day_of_week: u32,
    pub month: u32,
    pub lag_24: f64,
}

impl FeatureRow {
    /// Derive calendar features from `timestamp` and attach the lag value
    pub fn new(timestamp: NaiveDateTime, lag_24: f64) -> Self {
        Self {
            timestamp,
            hour_of_day: timestamp.hour(),
            day_of_week: timestamp.weekday().num_days_from_monday(),
            month: timestamp.month(),
            lag_24,
        }
    }

    /// Feature values in `FEATURE_NAMES` order
    pub fn values(&self) -> Vec<f64> {
        vec![
            self.hour_of_day as f64,
            self.day_of_week as f64,
            self.month as f64,
            self.lag_24,
        ]
    }
}

/// Row-major feature matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Create a matrix, checking every row has one value per column name
    pub fn new(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != names.len()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Row {} has {} values, expected {}",
                index,
                row.len(),
                names.len()
            )));
        }
        Ok(Self { names, rows })
    }

    /// Matrix over the standard feature schema
    pub fn from_rows(rows: &[FeatureRow]) -> Self {
        Self {
            names: feature_names(),
            rows: rows.iter().map(FeatureRow::values).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first non-finite cell, as `(row, column)`
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(i, row)| {
            row.iter().position(|v| !v.is_finite()).map(|j| (i, j))
        })
    }
}

/// `FEATURE_NAMES` as owned strings
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Historical-mode output: feature rows and their targets
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    rows: Vec<FeatureRow>,
    targets: Vec<f64>,
}

impl TrainingSet {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn matrix(&self) -> FeatureMatrix {
        FeatureMatrix::from_rows(&self.rows)
    }
}

/// Future-mode output: the recent history and the 24 rows to forecast
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastWindow {
    history: Vec<Observation>,
    rows: Vec<FeatureRow>,
}

impl ForecastWindow {
    /// The most recent `HORIZON` observations, oldest first
    pub fn history(&self) -> &[Observation] {
        &self.history
    }

    /// Feature rows for `last + 1h ..= last + 24h`
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.rows.iter().map(|row| row.timestamp).collect()
    }

    pub fn matrix(&self) -> FeatureMatrix {
        FeatureMatrix::from_rows(&self.rows)
    }
}

/// Builds training and forecast features from a series
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    spacing: SpacingPolicy,
}

impl FeatureBuilder {
    pub fn new(spacing: SpacingPolicy) -> Self {
        Self { spacing }
    }

    pub fn spacing(&self) -> SpacingPolicy {
        self.spacing
    }

    /// Historical mode: one row per observation that has a value 24 rows earlier.
    ///
    /// The first `LAG_HOURS` observations only serve as lags and produce no
    /// rows, so a series of `n` observations yields `n - 24` rows (or none).
    pub fn historical(&self, series: &HistoricalSeries) -> Result<TrainingSet> {
        let observations = series.observations();
        let expected_gap = Duration::hours(LAG_HOURS as i64);

        let mut rows = Vec::with_capacity(observations.len().saturating_sub(LAG_HOURS));
        let mut targets = Vec::with_capacity(rows.capacity());

        for (lagged, current) in observations.iter().zip(observations.iter().skip(LAG_HOURS)) {
            let gap = current.timestamp - lagged.timestamp;
            if gap != expected_gap {
                self.misaligned(format!(
                    "observation at {} is {} hours after its lag at {}, expected {}",
                    format_timestamp(&current.timestamp),
                    gap.num_hours(),
                    format_timestamp(&lagged.timestamp),
                    LAG_HOURS
                ))?;
            }

            rows.push(FeatureRow::new(current.timestamp, lagged.value));
            targets.push(current.value);
        }

        debug!(
            observations = observations.len(),
            rows = rows.len(),
            "built historical features"
        );

        Ok(TrainingSet { rows, targets })
    }

    /// Future mode: rows for the 24 hours after the last observation.
    ///
    /// The window is every observation within 23 hours of the latest one.
    /// Fewer than 24 such rows is `InsufficientHistory`.
    pub fn future(&self, series: &HistoricalSeries) -> Result<ForecastWindow> {
        let last = series
            .last_timestamp()
            .ok_or(ForecastError::InsufficientHistory {
                needed: HORIZON,
                got: 0,
            })?;
        let window_start = last - Duration::hours(HORIZON as i64 - 1);

        let observations = series.observations();
        let first_in_window = observations.partition_point(|obs| obs.timestamp < window_start);
        let mut window = &observations[first_in_window..];

        if window.len() < HORIZON {
            return Err(ForecastError::InsufficientHistory {
                needed: HORIZON,
                got: window.len(),
            });
        }

        if window.len() > HORIZON {
            self.misaligned(format!(
                "{} observations fall in the last {} hours, expected {}",
                window.len(),
                HORIZON,
                HORIZON
            ))?;
            window = &window[window.len() - HORIZON..];
        }

        for pair in window.windows(2) {
            if pair[1].timestamp - pair[0].timestamp != Duration::hours(1) {
                self.misaligned(format!(
                    "recent observations at {} and {} are not one hour apart",
                    format_timestamp(&pair[0].timestamp),
                    format_timestamp(&pair[1].timestamp)
                ))?;
            }
        }

        let rows = future_timestamps(last, HORIZON, Duration::hours(1))
            .into_iter()
            .zip(window.iter())
            .map(|(ts, past)| FeatureRow::new(ts, past.value))
            .collect();

        Ok(ForecastWindow {
            history: window.to_vec(),
            rows,
        })
    }

    fn misaligned(&self, detail: String) -> Result<()> {
        match self.spacing {
            SpacingPolicy::Strict => Err(ForecastError::MalformedSeries(detail)),
            SpacingPolicy::Lenient => {
                warn!("{}", detail);
                Ok(())
            }
        }
    }
}
