//! Regression models over the calendar + lag feature matrix
//!
//! Forecasting only needs "fit a matrix to targets, then predict a matrix",
//! so any algorithm implementing [`Regressor`] can replace the default
//! gradient boosting model without touching feature construction.

use crate::error::Result;
use crate::features::FeatureMatrix;
use std::fmt::Debug;

/// A fitted model, used read-only during forecasting
pub trait FittedModel: Debug + Send + Sync {
    /// Predict one value per feature row, in row order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Feature names the model was fitted on, in column order
    fn feature_names(&self) -> &[String];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Regression algorithm that can be fitted to a feature matrix
pub trait Regressor: Debug {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model to `targets`, one per feature row
    fn fit(&self, features: &FeatureMatrix, targets: &[f64]) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod gradient_boosting;
pub mod tree;

pub use gradient_boosting::{GbmParams, GradientBoostingRegressor, TrainedGradientBoosting};
