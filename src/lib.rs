//! # Load Forecast Workspace
//!
//! Umbrella crate for the hourly load forecasting workspace.
//!
//! - [`forecast`]: ingestion, features, models and 24-hour forecasts
//! - [`math`]: window statistics and forecast accuracy metrics
//!
//! ## Example
//!
//! ```
//! use load_forecast_workspace::math::SummaryStats;
//!
//! let stats = SummaryStats::from_values(&[900.0, 1100.0, 1000.0]).unwrap();
//! assert_eq!(stats.max, 1100.0);
//! assert_eq!(stats.min, 900.0);
//! assert_eq!(stats.average, 1000.0);
//! ```

pub use load_forecast as forecast;
pub use load_math as math;
