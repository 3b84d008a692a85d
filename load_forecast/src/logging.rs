//! Logging setup

use crate::error::{ForecastError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr subscriber filtered at `level`, unless `RUST_LOG` is set.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| {
            ForecastError::InvalidParameter(format!("Invalid log level '{}': {}", level, e))
        })?,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .ok();

    Ok(())
}
