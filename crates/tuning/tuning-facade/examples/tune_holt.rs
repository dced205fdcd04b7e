//! Tune Holt's linear-trend smoothing on a weekly count series
//!
//! Run with: cargo run --example tune_holt -p tuning-facade [-- series.csv [config.toml]]
//!
//! Without arguments a synthetic series and the built-in configuration are
//! used. Set `RUST_LOG=tuning_core=debug` to follow every evaluation.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuning_facade::prelude::*;
use tuning_facade::{load_series_csv, write_candidates_csv};

fn synthetic_series() -> Result<TimeSeries> {
    let counts: Vec<(i64, u64)> = (0..80)
        .map(|i| {
            let week = i as i64 * 604_800;
            let level = 120.0 + 2.5 * i as f64 + 15.0 * (i as f64 * 0.12).sin();
            (week, level.round() as u64)
        })
        .collect();
    TimeSeries::from_counts(&counts)
}

fn default_config() -> Result<TuningConfig> {
    TunerBuilder::new()
        .add_dimension(
            DimensionSpec::continuous(HoltForecast::ALPHA, 0.05, 0.95)
                .with_floor(0.01)
                .with_ceiling(0.99),
        )
        .add_dimension(
            DimensionSpec::stratified(HoltForecast::BETA, (0.001, 0.05), (0.05, 0.5), 0.5)
                .with_floor(0.001)
                .with_ceiling(0.99),
        )
        .seed_candidates(20)
        .iterations(15)
        .folds(8, None)
        .build()
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tuning_core=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let series = match args.next() {
        Some(path) => load_series_csv(path, None)?,
        None => synthetic_series()?,
    };
    let config = match args.next() {
        Some(path) => TuningConfig::from_file(path)?,
        None => default_config()?,
    };

    println!("=== Holt tuning ===\n");
    println!("Points: {}", series.len());
    println!("Seeds: {}, iterations: {}, kappa: {}\n", config.seed_candidates, config.iterations, config.kappa);

    let tuner = Tuner::new(config)?;
    let outcome = tuner.run(&HoltForecast, &series)?;

    println!("Search space:");
    for dim in outcome.space.dimensions() {
        println!("   {:<8} [{:.4}, {:.4}]", dim.name, dim.lo, dim.hi);
    }

    println!("\nBest candidate:");
    for (name, value) in outcome.best.params.iter() {
        println!("   {:<8} {:.4}", name, value);
    }
    match outcome.best.score.mape() {
        Some(mape) => println!("   MAPE     {:.2}%", mape * 100.0),
        None => println!("   no candidate could be scored"),
    }
    match outcome.improvement {
        Some(delta) => println!("   gain over best seed: {:.4}", delta),
        None => println!("   gain over best seed: n/a"),
    }

    let out = std::env::temp_dir().join("tune_holt_candidates.csv");
    write_candidates_csv(&outcome.candidates, &out)?;
    println!("\nCandidate table written to {}", out.display());

    Ok(())
}
