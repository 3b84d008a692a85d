//! Runtime configuration

use crate::data::ColumnAliases;
use crate::error::{ForecastError, Result};
use crate::features::SpacingPolicy;
use crate::models::GbmParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for training and forecasting.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides, e.g. `{"model": {"n_estimators": 50}, "spacing": "lenient"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Gradient boosting hyperparameters
    pub model: GbmParams,
    /// Hourly spacing enforcement for lag features
    pub spacing: SpacingPolicy,
    /// Field names accepted for timestamps and load values
    pub columns: ColumnAliases,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model: GbmParams::default(),
            spacing: SpacingPolicy::default(),
            columns: ColumnAliases::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ForecastConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ForecastError::InvalidParameter(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if self.columns.timestamp.is_empty() || self.columns.value.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Column aliases must name at least one timestamp and one value field".to_string(),
            ));
        }
        Ok(())
    }
}
