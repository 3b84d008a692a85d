//! Utility functions for the load_forecast crate

use crate::data::{HistoricalSeries, Observation};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::path::Path;

/// Wire format for timestamps in reports and CSV output
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string, returning `None` when no known format matches.
///
/// RFC 3339 timestamps with an offset are converted to UTC. A bare date is
/// read as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in ACCEPTED_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS`
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter for `YYYY-MM-DDTHH:MM:SS` timestamps
pub mod hourly_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Create future timestamps at a fixed step after `last_timestamp`
pub fn future_timestamps(
    last_timestamp: NaiveDateTime,
    horizon: usize,
    step: Duration,
) -> Vec<NaiveDateTime> {
    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for _ in 0..horizon {
        current = current + step;
        timestamps.push(current);
    }

    timestamps
}

/// Split a series into a training prefix and the trailing `test_len` observations
pub fn train_test_split(
    series: &HistoricalSeries,
    test_len: usize,
) -> (HistoricalSeries, HistoricalSeries) {
    let split = series.len().saturating_sub(test_len);
    (series.slice(0, Some(split)), series.slice(split, None))
}

/// Shape of a synthetic hourly load profile
#[derive(Debug, Clone)]
pub struct SyntheticLoad {
    /// Timestamp of the first observation
    pub start: NaiveDateTime,
    /// Number of hourly observations
    pub hours: usize,
    /// Mean load level
    pub base: f64,
    /// Peak-to-mean amplitude of the daily cycle
    pub daily_amplitude: f64,
    /// Load subtracted on Saturdays and Sundays
    pub weekend_dip: f64,
    /// Standard deviation of the Gaussian noise
    pub noise_std: f64,
    /// Seed for reproducible noise
    pub seed: Option<u64>,
}

impl Default for SyntheticLoad {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            hours: 24 * 14,
            base: 1000.0,
            daily_amplitude: 200.0,
            weekend_dip: 80.0,
            noise_std: 15.0,
            seed: None,
        }
    }
}

/// Generate a synthetic hourly load series with a daily cycle and weekend dip
pub fn generate_load_profile(profile: &SyntheticLoad) -> Result<HistoricalSeries> {
    let noise = Normal::new(0.0, profile.noise_std).map_err(|e| {
        ForecastError::InvalidParameter(format!(
            "Noise standard deviation {} is invalid: {}",
            profile.noise_std, e
        ))
    })?;
    let mut rng = match profile.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let observations = (0..profile.hours)
        .map(|i| {
            let timestamp = profile.start + Duration::hours(i as i64);
            // Daily peak lands at 18:00
            let phase = (timestamp.hour() as f64 - 12.0) / 24.0 * std::f64::consts::TAU;
            let mut value = profile.base + profile.daily_amplitude * phase.sin();
            if timestamp.weekday().number_from_monday() >= 6 {
                value -= profile.weekend_dip;
            }
            value += noise.sample(&mut rng);
            Observation::new(timestamp, value)
        })
        .collect();

    Ok(HistoricalSeries::new(observations))
}

/// Write a series as a `datetime,actual_load` CSV file
pub fn write_csv<P: AsRef<Path>>(series: &HistoricalSeries, path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["datetime", "actual_load"])?;
    for obs in series.observations() {
        writer.write_record([format_timestamp(&obs.timestamp), obs.value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_accepted_formats() {
        let expected = ts("2024-03-01T05:00:00");
        assert_eq!(parse_timestamp("2024-03-01T05:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 05:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T05:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T06:00:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01"), Some(ts("2024-03-01T00:00:00")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-01T00:00:00"), None);
    }

    #[test]
    fn test_future_timestamps_are_hourly() {
        let last = ts("2024-01-01T23:00:00");
        let future = future_timestamps(last, 24, Duration::hours(1));

        assert_eq!(future.len(), 24);
        assert_eq!(future[0], ts("2024-01-02T00:00:00"));
        assert_eq!(future[23], ts("2024-01-02T23:00:00"));
    }

    #[test]
    fn test_seeded_profile_is_reproducible() {
        let profile = SyntheticLoad {
            hours: 48,
            seed: Some(7),
            ..Default::default()
        };
        let a = generate_load_profile(&profile).unwrap();
        let b = generate_load_profile(&profile).unwrap();

        assert_eq!(a.len(), 48);
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_negative_noise_is_rejected() {
        let profile = SyntheticLoad {
            noise_std: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            generate_load_profile(&profile),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
