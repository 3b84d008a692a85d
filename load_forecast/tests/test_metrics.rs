use load_forecast::metrics::evaluate_holdout;
use load_forecast::utils::{generate_load_profile, train_test_split, SyntheticLoad};
use load_forecast::{ForecastError, Forecaster};
use pretty_assertions::assert_eq;

fn two_weeks(seed: u64) -> load_forecast::HistoricalSeries {
    generate_load_profile(&SyntheticLoad {
        hours: 24 * 14,
        seed: Some(seed),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_holdout_on_synthetic_load() {
    let series = two_weeks(42);
    let evaluation = evaluate_holdout(&Forecaster::default(), &series).unwrap();

    let (_, test) = train_test_split(&series, 24);
    assert_eq!(evaluation.actual, test.values());
    assert_eq!(evaluation.predicted.len(), 24);
    assert_eq!(evaluation.training_rows, 24 * 14 - 24 - 24);

    // daily swing is 400 MW around 1000 MW with 15 MW noise
    assert!(evaluation.accuracy.mae < 100.0, "mae {}", evaluation.accuracy.mae);
    assert!(evaluation.accuracy.mape < 10.0, "mape {}", evaluation.accuracy.mape);
    assert!(evaluation.accuracy.rmse >= evaluation.accuracy.mae);
}

#[test]
fn test_holdout_needs_two_days_and_an_hour() {
    let series = generate_load_profile(&SyntheticLoad {
        hours: 48,
        seed: Some(1),
        ..Default::default()
    })
    .unwrap();

    let result = evaluate_holdout(&Forecaster::default(), &series);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { needed: 49, got: 48 })
    ));
}

#[test]
fn test_seeded_profiles_are_reproducible() {
    assert_eq!(two_weeks(3), two_weeks(3));
    assert_ne!(two_weeks(3).values(), two_weeks(4).values());
}
