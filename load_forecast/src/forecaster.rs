//! Training and 24-hour forecasting

use crate::codec::ModelCodec;
use crate::config::ForecastConfig;
use crate::data::{ColumnAliases, DataLoader, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::features::{feature_names, FeatureBuilder, FEATURE_NAMES, HORIZON, LAG_HOURS};
use crate::models::{FittedModel, GradientBoostingRegressor, Regressor};
use crate::report::ForecastReport;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Facts about a training run, returned next to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub features: Vec<String>,
    pub status: String,
    pub training_rows: usize,
    pub model: String,
}

/// A fitted model with its metadata
#[derive(Debug, Clone)]
pub struct TrainedModel<M> {
    pub model: M,
    pub metadata: ModelMetadata,
}

/// Encoded model bytes with their metadata
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    pub model: Vec<u8>,
    pub metadata: ModelMetadata,
}

/// Trains a regressor on calendar + lag features and forecasts the next 24 hours
#[derive(Debug, Clone)]
pub struct Forecaster<R = GradientBoostingRegressor> {
    regressor: R,
    features: FeatureBuilder,
    columns: ColumnAliases,
}

impl Forecaster<GradientBoostingRegressor> {
    /// Gradient boosting forecaster configured from `config`
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            regressor: GradientBoostingRegressor::new(config.model.clone())?,
            features: FeatureBuilder::new(config.spacing),
            columns: config.columns.clone(),
        })
    }
}

impl Default for Forecaster<GradientBoostingRegressor> {
    fn default() -> Self {
        Self::new(GradientBoostingRegressor::default(), FeatureBuilder::default())
    }
}

impl<R: Regressor> Forecaster<R> {
    pub fn new(regressor: R, features: FeatureBuilder) -> Self {
        Self {
            regressor,
            features,
            columns: ColumnAliases::default(),
        }
    }

    /// Use different field names when reading records
    pub fn with_columns(mut self, columns: ColumnAliases) -> Self {
        self.columns = columns;
        self
    }

    pub fn feature_builder(&self) -> &FeatureBuilder {
        &self.features
    }

    pub fn columns(&self) -> &ColumnAliases {
        &self.columns
    }

    /// Fit the regressor on every observation that has a 24-hour lag.
    ///
    /// Needs at least `LAG_HOURS + 1` observations.
    pub fn train(&self, series: &HistoricalSeries) -> Result<TrainedModel<R::Fitted>> {
        let training_set = self.features.historical(series)?;
        if training_set.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                needed: LAG_HOURS + 1,
                got: series.len(),
            });
        }

        let model = self
            .regressor
            .fit(&training_set.matrix(), training_set.targets())?;

        let metadata = ModelMetadata {
            trained_at: Utc::now(),
            features: feature_names(),
            status: "success".to_string(),
            training_rows: training_set.len(),
            model: self.regressor.name().to_string(),
        };
        info!(
            rows = metadata.training_rows,
            model = %metadata.model,
            "model trained"
        );

        Ok(TrainedModel { model, metadata })
    }

    /// Forecast the 24 hours after the last observation in `series`
    pub fn forecast<M>(&self, model: &M, series: &HistoricalSeries) -> Result<ForecastReport>
    where
        M: FittedModel + ?Sized,
    {
        let window = self.features.future(series)?;

        if model.feature_names().iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ForecastError::ModelIncompatible(format!(
                "Model '{}' was fitted on {:?}, expected {:?}",
                model.name(),
                model.feature_names(),
                FEATURE_NAMES
            )));
        }

        let predictions = model.predict(&window.matrix())?;
        if predictions.len() != HORIZON {
            return Err(ForecastError::PredictionFailed(format!(
                "Model returned {} predictions, expected {}",
                predictions.len(),
                HORIZON
            )));
        }

        let timestamps = window.timestamps();
        debug!(
            first = ?timestamps.first(),
            last = ?timestamps.last(),
            "forecast window predicted"
        );

        ForecastReport::assemble(window.history(), &timestamps, &predictions)
    }
}

impl<R> Forecaster<R>
where
    R: Regressor,
    R::Fitted: Serialize + DeserializeOwned,
{
    /// Train from raw records and encode the model for transport
    pub fn train_records<C: ModelCodec>(
        &self,
        codec: &C,
        records: &[Value],
    ) -> Result<TrainingOutput> {
        let series = DataLoader::from_records_with(records, &self.columns)?;
        let trained = self.train(&series)?;
        Ok(TrainingOutput {
            model: codec.encode(&trained.model)?,
            metadata: trained.metadata,
        })
    }

    /// Decode a transported model and forecast from raw history records
    pub fn forecast_records<C: ModelCodec>(
        &self,
        codec: &C,
        model_bytes: &[u8],
        records: &[Value],
    ) -> Result<ForecastReport> {
        let model: R::Fitted = codec.decode(model_bytes)?;
        let series = DataLoader::from_records_with(records, &self.columns)?;
        self.forecast(&model, &series)
    }
}
