//! End-to-end tests for the tuning facade
//!
//! Full tuning runs driven through the public API only.

use tuning_facade::prelude::*;
use tuning_facade::{load_candidates_json, save_candidates_json, write_candidates_csv};

fn trending_series() -> TimeSeries {
    let values: Vec<f64> = (0..60)
        .map(|i| 200.0 + 3.0 * i as f64 + 6.0 * (i as f64 * 0.9).sin())
        .collect();
    TimeSeries::regular(1_600_000_000, 604_800, &values).unwrap()
}

fn holt_config() -> TuningConfig {
    TunerBuilder::new()
        .add_dimension(
            DimensionSpec::continuous("alpha", 0.05, 0.95)
                .with_floor(0.01)
                .with_ceiling(0.99),
        )
        .add_dimension(
            DimensionSpec::stratified("beta", (0.01, 0.1), (0.1, 0.6), 0.5)
                .with_floor(0.01)
                .with_ceiling(0.99),
        )
        .seed_candidates(8)
        .iterations(6)
        .acquisition_samples(300)
        .refinement(3, 20)
        .folds(6, None)
        .build()
        .unwrap()
}

#[test]
fn e2e_holt_tuning_improves_or_keeps_seed_best() {
    let tuner = Tuner::new(holt_config()).unwrap();
    let outcome = tuner.run(&HoltForecast, &trending_series()).unwrap();

    assert_eq!(outcome.candidates.len(), 14);
    assert_eq!(outcome.best_score_history.len(), 6);
    assert!(outcome.best_score_history.windows(2).all(|w| w[1] >= w[0]));

    let improvement = outcome.improvement.expect("holt scores every candidate here");
    assert!(improvement >= 0.0);
    assert!(outcome.best.score.is_scored());

    // Negated MAPE on a smooth positive series stays small
    let mape = outcome.best.score.mape().unwrap();
    assert!(mape < 0.1, "best MAPE too large: {}", mape);

    // Every optimization-phase candidate lies in the derived space
    for row in outcome.candidates.rows().iter().filter(|r| r.phase == Phase::Optimization) {
        assert!(outcome.space.check(&row.params).is_ok());
    }
}

#[test]
fn e2e_moving_average_integer_window() {
    let series = trending_series();
    let config = TunerBuilder::new()
        .add_dimension(DimensionSpec::integer("window", 1, 12).with_floor(1.0))
        .seed_candidates(6)
        .iterations(4)
        .acquisition_samples(200)
        .folds(5, None)
        .build()
        .unwrap();

    let outcome = Tuner::new(config)
        .unwrap()
        .run(&MovingAverageForecast, &series)
        .unwrap();

    for row in outcome.candidates.rows() {
        let window = row.params.get("window").unwrap();
        assert_eq!(window, window.round());
        assert!(window >= 1.0);
    }
    assert_eq!(outcome.space.dimensions()[0].name, "window");
    assert!(outcome.best.score.is_scored());
}

#[test]
fn e2e_save_reload_and_resume() {
    let series = trending_series();
    let tuner = Tuner::new(holt_config()).unwrap();
    let first = tuner.run(&HoltForecast, &series).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("candidates.json");
    let csv_path = dir.path().join("candidates.csv");
    save_candidates_json(&first.candidates, &json_path).unwrap();
    write_candidates_csv(&first.candidates, &csv_path).unwrap();

    let reloaded = load_candidates_json(&json_path).unwrap();
    assert_eq!(reloaded, first.candidates);

    let resumed = tuner.resume(&HoltForecast, &series, reloaded).unwrap();
    assert_eq!(resumed.candidates.len(), first.candidates.len() + 6);
    assert!(resumed.best.score.value() >= first.best.score.value());

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().next().unwrap(), "alpha,beta,score,phase");
    assert_eq!(csv.lines().count(), first.candidates.len() + 1);
}

#[test]
fn e2e_config_from_toml_drives_tuner() {
    let toml = r#"
        seed_candidates = 5
        iterations = 3
        kappa = 0.5
        rng_seed = 7

        [[dimensions]]
        name = "alpha"
        kind = "continuous"
        floor = 0.01
        ceiling = 0.99
        distribution = { type = "uniform", lo = 0.1, hi = 0.9 }

        [[dimensions]]
        name = "beta"
        kind = "continuous"
        distribution = { type = "uniform", lo = 0.05, hi = 0.3 }

        [folds]
        n_folds = 4

        [acquisition]
        n_samples = 150
    "#;
    let config = TuningConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.rng_seed, 7);

    let outcome = Tuner::new(config)
        .unwrap()
        .run(&HoltForecast, &trending_series())
        .unwrap();
    assert_eq!(outcome.candidates.len(), 8);
}
