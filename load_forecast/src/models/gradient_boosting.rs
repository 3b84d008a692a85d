//! Gradient boosted regression trees with a squared-error objective

use crate::error::{ForecastError, Result};
use crate::features::FeatureMatrix;
use crate::models::tree::{RegressionTree, TreeParams};
use crate::models::{FittedModel, Regressor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// GBM hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GbmParams {
    /// Number of boosting iterations (trees)
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in a leaf node
    pub min_samples_leaf: usize,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: 6,
            learning_rate: 0.05,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl GbmParams {
    /// Check every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if self.min_samples_split < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForecastError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Untrained gradient boosting regressor
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    name: String,
    params: GbmParams,
}

/// Fitted gradient boosting model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelParts")]
pub struct TrainedGradientBoosting {
    name: String,
    params: GbmParams,
    /// Initial prediction, the mean training target
    base_score: f64,
    trees: Vec<RegressionTree>,
    feature_names: Vec<String>,
    /// Split gain per feature, normalised to sum to 1
    feature_importance: Vec<f64>,
}

/// Decoded fields, checked before they become a model
#[derive(Deserialize)]
struct ModelParts {
    name: String,
    params: GbmParams,
    base_score: f64,
    trees: Vec<RegressionTree>,
    feature_names: Vec<String>,
    feature_importance: Vec<f64>,
}

impl TryFrom<ModelParts> for TrainedGradientBoosting {
    type Error = String;

    fn try_from(parts: ModelParts) -> std::result::Result<Self, Self::Error> {
        if !parts.base_score.is_finite() {
            return Err("base_score is not finite".to_string());
        }
        if parts.feature_importance.len() != parts.feature_names.len() {
            return Err(format!(
                "{} importance values for {} features",
                parts.feature_importance.len(),
                parts.feature_names.len()
            ));
        }
        let width = parts.feature_names.len();
        if let Some((index, feature)) = parts
            .trees
            .iter()
            .enumerate()
            .find_map(|(i, tree)| tree.max_feature().filter(|&f| f >= width).map(|f| (i, f)))
        {
            return Err(format!(
                "tree {} splits on feature {} but the model has {} features",
                index, feature, width
            ));
        }

        Ok(Self {
            name: parts.name,
            params: parts.params,
            base_score: parts.base_score,
            trees: parts.trees,
            feature_names: parts.feature_names,
            feature_importance: parts.feature_importance,
        })
    }
}

impl GradientBoostingRegressor {
    /// Create a regressor with validated parameters
    pub fn new(params: GbmParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            name: model_name(&params),
            params,
        })
    }

    pub fn params(&self) -> &GbmParams {
        &self.params
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        let params = GbmParams::default();
        Self {
            name: model_name(&params),
            params,
        }
    }
}

impl Regressor for GradientBoostingRegressor {
    type Fitted = TrainedGradientBoosting;

    fn fit(&self, features: &FeatureMatrix, targets: &[f64]) -> Result<Self::Fitted> {
        if features.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Cannot fit on an empty feature matrix".to_string(),
            ));
        }
        if features.n_rows() != targets.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Feature rows ({}) don't match targets ({})",
                features.n_rows(),
                targets.len()
            )));
        }
        if let Some((row, col)) = features.first_non_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "Feature '{}' is not finite in row {}",
                features.names()[col],
                row
            )));
        }
        if let Some(row) = targets.iter().position(|t| !t.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Target is not finite in row {}",
                row
            )));
        }

        info!(
            rows = features.n_rows(),
            features = features.n_features(),
            params = ?self.params,
            "training gradient boosting regressor"
        );

        let rows = features.rows();
        let tree_params = self.params.tree_params();
        let base_score = targets.iter().sum::<f64>() / targets.len() as f64;
        let mut predictions = vec![base_score; targets.len()];
        let mut importance = vec![0.0; features.n_features()];
        let mut trees = Vec::with_capacity(self.params.n_estimators);

        for round in 0..self.params.n_estimators {
            let residuals: Vec<f64> = targets
                .iter()
                .zip(predictions.iter())
                .map(|(y, p)| y - p)
                .collect();

            let tree = RegressionTree::fit(rows, &residuals, &tree_params, &mut importance);
            for (pred, row) in predictions.iter_mut().zip(rows) {
                *pred += self.params.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);

            if (round + 1) % 50 == 0 {
                debug!(
                    round = round + 1,
                    mse = mean_squared_error(targets, &predictions),
                    "boosting progress"
                );
            }
        }

        let total: f64 = importance.iter().sum();
        if total > 0.0 {
            importance.iter_mut().for_each(|v| *v /= total);
        }

        info!(
            trees = trees.len(),
            train_mse = mean_squared_error(targets, &predictions),
            "training completed"
        );

        Ok(TrainedGradientBoosting {
            name: self.name.clone(),
            params: self.params.clone(),
            base_score,
            trees,
            feature_names: features.names().to_vec(),
            feature_importance: importance,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedGradientBoosting {
    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Feature importance as `(name, share)` pairs, most important first
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let mut pairs: Vec<(String, f64)> = self
            .feature_names
            .iter()
            .cloned()
            .zip(self.feature_importance.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.trees.iter().fold(self.base_score, |acc, tree| {
            acc + self.params.learning_rate * tree.predict_row(row)
        })
    }
}

impl FittedModel for TrainedGradientBoosting {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if features.names() != self.feature_names.as_slice() {
            return Err(ForecastError::ModelIncompatible(format!(
                "Model expects features {:?}, got {:?}",
                self.feature_names,
                features.names()
            )));
        }
        if let Some((row, col)) = features.first_non_finite() {
            return Err(ForecastError::PredictionFailed(format!(
                "Feature '{}' is not finite in row {}",
                features.names()[col],
                row
            )));
        }

        let predictions: Vec<f64> = features
            .rows()
            .iter()
            .map(|row| self.predict_row(row))
            .collect();

        if let Some(row) = predictions.iter().position(|p| !p.is_finite()) {
            return Err(ForecastError::PredictionFailed(format!(
                "Model produced a non-finite prediction for row {}",
                row
            )));
        }

        Ok(predictions)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn model_name(params: &GbmParams) -> String {
    format!(
        "Gradient Boosting (trees={}, depth={}, lr={})",
        params.n_estimators, params.max_depth, params.learning_rate
    )
}

fn mean_squared_error(targets: &[f64], predictions: &[f64]) -> f64 {
    targets
        .iter()
        .zip(predictions)
        .map(|(y, p)| (y - p).powi(2))
        .sum::<f64>()
        / targets.len().max(1) as f64
}
