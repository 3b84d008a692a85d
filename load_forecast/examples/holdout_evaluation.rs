use load_forecast::metrics::evaluate_holdout;
use load_forecast::utils::{generate_load_profile, SyntheticLoad};
use load_forecast::{FeatureBuilder, Forecaster, GbmParams, GradientBoostingRegressor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Load Forecast: Holdout Evaluation Example");
    println!("=========================================\n");

    let series = generate_load_profile(&SyntheticLoad {
        hours: 24 * 28,
        seed: Some(7),
        ..Default::default()
    })?;

    // Compare a few tree depths on the same withheld final day
    for max_depth in [2, 4, 6] {
        let params = GbmParams {
            max_depth,
            ..GbmParams::default()
        };
        let forecaster = Forecaster::new(
            GradientBoostingRegressor::new(params)?,
            FeatureBuilder::default(),
        );

        let evaluation = evaluate_holdout(&forecaster, &series)?;
        println!("max_depth = {}", max_depth);
        println!("{}", evaluation);
    }

    Ok(())
}
