//! Command line front end for training, forecasting and evaluation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use load_forecast::codec::JsonCodec;
use load_forecast::logging::init_logging;
use load_forecast::metrics::evaluate_holdout;
use load_forecast::utils::{generate_load_profile, write_csv, SyntheticLoad};
use load_forecast::{DataLoader, ForecastConfig, ForecastError, Forecaster, SpacingPolicy};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "load_forecast", version, about = "Hourly load forecasting")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "load_forecast=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Accept series that are not exactly hourly
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a model from historical records
    Train {
        /// CSV or JSON records with timestamps and load values
        #[arg(long)]
        input: PathBuf,
        /// Where to write the encoded model
        #[arg(long)]
        output: PathBuf,
    },
    /// Forecast the 24 hours after the last record
    Forecast {
        /// Encoded model written by `train`
        #[arg(long)]
        model: PathBuf,
        /// CSV or JSON records covering at least the last 24 hours
        #[arg(long)]
        input: PathBuf,
    },
    /// Train on all but the last day and score the forecast for it
    Evaluate {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a CSV file as JSON records
    Records {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write a synthetic hourly load profile as CSV
    Generate {
        #[arg(long, default_value_t = 24 * 14)]
        hours: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = match err.downcast_ref::<ForecastError>() {
                Some(forecast_err) => serde_json::to_value(forecast_err.report()),
                None => Ok(serde_json::json!({
                    "status": "failed",
                    "error": format!("{:#}", err),
                })),
            };
            match report {
                Ok(report) => println!("{}", report),
                Err(_) => eprintln!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.lenient {
        config.spacing = SpacingPolicy::Lenient;
    }

    init_logging(&config.log_level)?;
    let forecaster = Forecaster::from_config(&config)?;
    debug!(
        spacing = ?forecaster.feature_builder().spacing(),
        columns = ?forecaster.columns(),
        "forecaster configured"
    );
    let codec = JsonCodec::new();

    match cli.command {
        Command::Train { input, output } => {
            let records = DataLoader::read_records(&input)?;
            let trained = forecaster.train_records(&codec, &records)?;
            fs::write(&output, &trained.model)
                .with_context(|| format!("writing model to {}", output.display()))?;
            info!(path = %output.display(), "model written");
            println!("{}", serde_json::to_string_pretty(&trained.metadata)?);
        }
        Command::Forecast { model, input } => {
            let bytes = fs::read(&model)
                .with_context(|| format!("reading model {}", model.display()))?;
            let records = DataLoader::read_records(&input)?;
            let report = forecaster.forecast_records(&codec, &bytes, &records)?;
            println!("{}", report.to_json()?);
        }
        Command::Evaluate { input } => {
            let series = DataLoader::from_file(&input, forecaster.columns())?;
            let evaluation = evaluate_holdout(&forecaster, &series)?;
            eprint!("{}", evaluation);
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        Command::Records { input } => {
            let records = DataLoader::read_csv_records(&input)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Generate {
            hours,
            seed,
            output,
        } => {
            let profile = SyntheticLoad {
                hours,
                seed,
                ..Default::default()
            };
            let series = generate_load_profile(&profile)?;
            write_csv(&series, &output)?;
            info!(hours, path = %output.display(), "synthetic profile written");
        }
    }

    Ok(())
}
