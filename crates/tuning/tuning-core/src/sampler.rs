//! Random grid sampler used to seed the candidate pool.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};
use tuning_spi::{
    CandidateRow, CandidateSet, DimensionSpec, FoldSchedule, ForecastModel, Hyperparameters,
    ParamKind, Phase, SamplingDistribution, TimeSeries,
};

use crate::evaluator::RollingOriginEvaluator;

/// Draws candidates dimension by dimension from their configured
/// distributions. Deterministic for a given PRNG state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGridSampler;

impl RandomGridSampler {
    pub fn new() -> Self {
        Self
    }

    /// Draw `n` unevaluated candidates.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        specs: &[DimensionSpec],
        rng: &mut R,
    ) -> Vec<Hyperparameters> {
        let columns: Vec<Vec<f64>> = specs.iter().map(|s| draw_column(s, n, rng)).collect();

        (0..n)
            .map(|i| {
                specs
                    .iter()
                    .zip(&columns)
                    .fold(Hyperparameters::new(), |p, (spec, col)| {
                        p.with_param(&spec.name, col[i])
                    })
            })
            .collect()
    }

    /// Draw `n` candidates and score each one before it enters the set.
    pub fn sample_and_evaluate<R: Rng + ?Sized>(
        &self,
        n: usize,
        specs: &[DimensionSpec],
        rng: &mut R,
        evaluator: &RollingOriginEvaluator,
        model: &dyn ForecastModel,
        dataset: &TimeSeries,
        schedule: &FoldSchedule,
    ) -> CandidateSet {
        info!(n, model = model.name(), "seeding candidate pool");

        let mut set = CandidateSet::new();
        for params in self.sample(n, specs, rng) {
            let score = evaluator.evaluate(model, &params, dataset, schedule);
            debug!(?params, ?score, "seed candidate evaluated");
            set.push(CandidateRow {
                params,
                score,
                phase: Phase::Seed,
            });
        }
        set
    }
}

fn draw_column<R: Rng + ?Sized>(spec: &DimensionSpec, n: usize, rng: &mut R) -> Vec<f64> {
    let mut column: Vec<f64> = match &spec.distribution {
        SamplingDistribution::Uniform { lo, hi } => {
            (0..n).map(|_| rng.gen_range(*lo..=*hi)).collect()
        }
        SamplingDistribution::Stratified {
            low,
            high,
            low_share,
        } => {
            let n_low = ((n as f64 * low_share).round() as usize).min(n);
            let mut column = Vec::with_capacity(n);
            for _ in 0..n_low {
                column.push(rng.gen_range(low.0..=low.1));
            }
            for _ in n_low..n {
                column.push(rng.gen_range(high.0..=high.1));
            }
            // Strata must not line up across dimensions
            column.shuffle(rng);
            column
        }
    };

    if spec.kind == ParamKind::Integer {
        column.iter_mut().for_each(|v| *v = v.round());
    }
    column
}
