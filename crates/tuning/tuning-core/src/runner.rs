//! Tuner entry point
//!
//! Wires a validated [`TuningConfig`] into a trailing fold schedule, a seeded
//! RNG and the [`BayesianOptimizer`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tuning_api::TuningConfig;
use tuning_spi::{CandidateSet, FoldSchedule, ForecastModel, Result, TimeSeries};

use crate::bayesian::{BayesianOptimizer, TuningOutcome};

/// Runs a tuning job for one model over one dataset.
pub struct Tuner {
    config: TuningConfig,
    optimizer: BayesianOptimizer,
}

impl Tuner {
    /// Validate `config` and build the optimizer it describes.
    pub fn new(config: TuningConfig) -> Result<Self> {
        config.validate()?;
        let optimizer = BayesianOptimizer::from_config(&config);
        Ok(Self { config, optimizer })
    }

    pub fn config(&self) -> &TuningConfig {
        &self.config
    }

    /// Fold schedule over the last `n_folds` points of `dataset`.
    pub fn schedule(&self, dataset: &TimeSeries) -> Result<FoldSchedule> {
        FoldSchedule::trailing(dataset, self.config.folds.n_folds, self.config.folds.step)
    }

    pub fn run(&self, model: &dyn ForecastModel, dataset: &TimeSeries) -> Result<TuningOutcome> {
        let schedule = self.schedule(dataset)?;
        let mut rng = StdRng::seed_from_u64(self.config.rng_seed);

        info!(
            model = model.name(),
            points = dataset.len(),
            folds = schedule.len(),
            "tuning run started"
        );

        self.optimizer.run(
            model,
            dataset,
            &schedule,
            &self.config.dimensions,
            &mut rng,
        )
    }

    /// Continue optimizing from a previously saved candidate set.
    pub fn resume(
        &self,
        model: &dyn ForecastModel,
        dataset: &TimeSeries,
        candidates: CandidateSet,
    ) -> Result<TuningOutcome> {
        let schedule = self.schedule(dataset)?;
        // Offset so a resumed run does not replay the original draws
        let mut rng = StdRng::seed_from_u64(self.config.rng_seed.wrapping_add(candidates.len() as u64));

        info!(
            model = model.name(),
            existing = candidates.len(),
            "tuning run resumed"
        );

        self.optimizer.resume(
            model,
            dataset,
            &schedule,
            &self.config.dimensions,
            candidates,
            &mut rng,
        )
    }
}
