//! Bayesian optimization loop.
//!
//! `SEEDING -> {SURROGATE_FIT -> ACQUIRE -> EVALUATE -> APPEND}* -> TERMINATED`
//!
//! Seeding draws and scores random candidates and derives the search space
//! from their empirical range. Every iteration refits the surrogate from
//! scratch, proposes one candidate, scores it and appends it whether or not
//! it improves on the best. The loop always runs its configured iteration
//! count.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tuning_api::TuningConfig;
use tuning_spi::{
    CandidateRow, CandidateSet, DimensionSpec, FoldSchedule, ForecastModel, HyperparameterSpace,
    Hyperparameters, Phase, Result, Score, TimeSeries, TuningError,
};

use crate::acquisition::AcquisitionOptimizer;
use crate::evaluator::RollingOriginEvaluator;
use crate::sampler::RandomGridSampler;
use crate::surrogate::GaussianProcess;

/// Final result of a tuning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningOutcome {
    /// Best row ever observed, seed or optimization phase
    pub best: CandidateRow,
    /// Best score among seed rows alone
    pub best_seed_score: Score,
    /// `best - best_seed_score`; `None` when either side is unscorable
    pub improvement: Option<f64>,
    /// Space the optimization phase searched
    pub space: HyperparameterSpace,
    /// Every evaluated row in evaluation order
    pub candidates: CandidateSet,
    /// Best score after each optimization iteration (non-decreasing)
    pub best_score_history: Vec<f64>,
}

impl TuningOutcome {
    pub fn best_params(&self) -> &Hyperparameters {
        &self.best.params
    }

    pub fn best_score(&self) -> Score {
        self.best.score
    }
}

/// Seeds a candidate pool, then alternates surrogate fitting, acquisition
/// and evaluation for a fixed number of iterations.
#[derive(Debug, Clone)]
pub struct BayesianOptimizer {
    seed_candidates: usize,
    iterations: usize,
    kappa: f64,
    margin: f64,
    evaluator: RollingOriginEvaluator,
    sampler: RandomGridSampler,
    surrogate: GaussianProcess,
    acquisition: AcquisitionOptimizer,
}

impl BayesianOptimizer {
    pub fn from_config(config: &TuningConfig) -> Self {
        Self {
            seed_candidates: config.seed_candidates,
            iterations: config.iterations,
            kappa: config.kappa,
            margin: config.margin,
            evaluator: RollingOriginEvaluator::new(config.folds.min_train_points),
            sampler: RandomGridSampler::new(),
            surrogate: GaussianProcess::new(config.surrogate.clone()),
            acquisition: AcquisitionOptimizer::new(config.acquisition.clone()),
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    pub fn evaluator(&self) -> &RollingOriginEvaluator {
        &self.evaluator
    }

    /// Seed, then optimize.
    pub fn run<R: Rng + ?Sized>(
        &self,
        model: &dyn ForecastModel,
        dataset: &TimeSeries,
        schedule: &FoldSchedule,
        specs: &[DimensionSpec],
        rng: &mut R,
    ) -> Result<TuningOutcome> {
        let seeds = self.sampler.sample_and_evaluate(
            self.seed_candidates,
            specs,
            rng,
            &self.evaluator,
            model,
            dataset,
            schedule,
        );
        self.resume(model, dataset, schedule, specs, seeds, rng)
    }

    /// Continue from an existing candidate set, e.g. one reloaded from disk.
    ///
    /// The space is derived from the set's seed rows (all rows when it has
    /// none), and `iterations` new rows are appended.
    pub fn resume<R: Rng + ?Sized>(
        &self,
        model: &dyn ForecastModel,
        dataset: &TimeSeries,
        schedule: &FoldSchedule,
        specs: &[DimensionSpec],
        mut candidates: CandidateSet,
        rng: &mut R,
    ) -> Result<TuningOutcome> {
        let mut seed_params: Vec<Hyperparameters> = candidates
            .rows()
            .iter()
            .filter(|r| r.phase == Phase::Seed)
            .map(|r| r.params.clone())
            .collect();
        if seed_params.is_empty() {
            seed_params = candidates.rows().iter().map(|r| r.params.clone()).collect();
        }

        let space = HyperparameterSpace::from_samples(specs, &seed_params, self.margin)?;
        let best_seed_score = candidates
            .best_in_phase(Phase::Seed)
            .map(|r| r.score)
            .unwrap_or(Score::Unscorable);

        info!(
            seeds = candidates.len(),
            iterations = self.iterations,
            kappa = self.kappa,
            best_seed = best_seed_score.value(),
            "starting bayesian optimization"
        );

        let mut best_score_history = Vec::with_capacity(self.iterations);
        for iteration in 0..self.iterations {
            let surrogate = self.surrogate.fit(&candidates, &space)?;
            let params = self
                .acquisition
                .propose(&surrogate, &space, self.kappa, rng)?;
            let score = self.evaluator.evaluate(model, &params, dataset, schedule);

            if !score.is_scored() {
                warn!(iteration, ?params, "proposed candidate is unscorable");
            }
            debug!(iteration, ?params, ?score, "candidate evaluated");

            candidates.push(CandidateRow {
                params,
                score,
                phase: Phase::Optimization,
            });

            if let Some(best) = candidates.best() {
                best_score_history.push(best.score.value());
            }
        }

        let best = candidates
            .best()
            .cloned()
            .ok_or_else(|| TuningError::InvalidData("no candidates were evaluated".into()))?;

        let improvement = match (best.score, best_seed_score) {
            (Score::Scored(b), Score::Scored(s)) => Some(b - s),
            _ => None,
        };

        info!(
            best = best.score.value(),
            improvement = improvement.unwrap_or(f64::NAN),
            evaluations = candidates.len(),
            "bayesian optimization finished"
        );

        Ok(TuningOutcome {
            best,
            best_seed_score,
            improvement,
            space,
            candidates,
            best_score_history,
        })
    }
}

impl Default for BayesianOptimizer {
    fn default() -> Self {
        Self::from_config(&TuningConfig::default())
    }
}
