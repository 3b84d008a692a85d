use load_forecast::codec::{JsonCodec, ModelCodec};
use load_forecast::models::TrainedGradientBoosting;
use load_forecast::utils::{generate_load_profile, SyntheticLoad};
use load_forecast::Forecaster;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Load Forecast: Basic Forecasting Example");
    println!("========================================\n");

    println!("Creating two weeks of synthetic hourly load...");
    let series = generate_load_profile(&SyntheticLoad {
        seed: Some(42),
        ..Default::default()
    })?;
    println!(
        "Sample data created: {} hourly points ending {:?}\n",
        series.len(),
        series.last_timestamp()
    );

    println!("Training gradient boosting model...");
    let forecaster = Forecaster::default();
    let trained = forecaster.train(&series)?;
    println!(
        "Model trained on {} rows with features {:?}",
        trained.metadata.training_rows, trained.metadata.features
    );

    println!("\nFeature importance:");
    for (name, share) in trained.model.feature_importance() {
        println!("  {:<12} {:.3}", name, share);
    }

    // Ship the model as bytes and forecast with the decoded copy
    let codec = JsonCodec::new();
    let bytes = codec.encode(&trained.model)?;
    let model: TrainedGradientBoosting = codec.decode(&bytes)?;
    println!("\nEncoded model size: {} bytes", bytes.len());

    let report = forecaster.forecast(&model, &series)?;

    println!("\nNext 24 hours:");
    for point in &report.future_24h_data {
        println!("  {}  {:>8.1} MW", point.timestamp, point.predicted_value);
    }

    println!("\nPast 24h:   {}", report.statistics.past_24h);
    println!("Future 24h: {}", report.statistics.future_24h);

    Ok(())
}
