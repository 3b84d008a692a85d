//! # Load Forecast
//!
//! Hourly load forecasting from calendar features and a 24-hour lag.
//!
//! ## Features
//!
//! - Record and CSV ingestion with column aliasing
//! - Calendar + lag feature construction for training and for the next 24 hours
//! - Gradient boosted regression trees behind a swappable `Regressor` trait
//! - Model transport through a `ModelCodec`
//! - Forecast reports with past/future window statistics
//! - Holdout evaluation against a withheld final day
//!
//! ## Quick Start
//!
//! ```no_run
//! use load_forecast::{DataLoader, Forecaster};
//!
//! let series = DataLoader::from_csv("hourly_load.csv")?;
//! let forecaster = Forecaster::default();
//!
//! let trained = forecaster.train(&series)?;
//! let report = forecaster.forecast(&trained.model, &series)?;
//!
//! println!("{}", report.to_json()?);
//! # Ok::<(), load_forecast::ForecastError>(())
//! ```

pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use crate::codec::{JsonCodec, ModelCodec};
pub use crate::config::ForecastConfig;
pub use crate::data::{ColumnAliases, DataLoader, HistoricalSeries, Observation};
pub use crate::error::{ErrorKind, ErrorReport, ForecastError};
pub use crate::features::{FeatureBuilder, SpacingPolicy, FEATURE_NAMES, HORIZON, LAG_HOURS};
pub use crate::forecaster::{Forecaster, ModelMetadata, TrainedModel, TrainingOutput};
pub use crate::models::{FittedModel, GbmParams, GradientBoostingRegressor, Regressor};
pub use crate::report::ForecastReport;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
