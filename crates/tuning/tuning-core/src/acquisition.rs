//! Upper-confidence-bound acquisition and its bounded maximization.

use std::cmp::Ordering;

use rand::Rng;
use tracing::debug;
use tuning_api::AcquisitionConfig;
use tuning_spi::{HyperparameterSpace, Hyperparameters, Result, TuningError};

use crate::surrogate::SurrogateModel;

/// Smallest pattern-search step, in unit-cube units.
const MIN_STEP: f64 = 1e-4;
/// Initial pattern-search step as a fraction of each dimension's width.
const INITIAL_STEP: f64 = 0.1;

/// `a(x) = mean + kappa * std`.
pub fn upper_confidence_bound(mean: f64, std: f64, kappa: f64) -> f64 {
    mean + kappa * std
}

/// Maximizes UCB over the space with dense random sampling followed by a
/// coordinate pattern search from the best samples.
#[derive(Debug, Clone)]
pub struct AcquisitionOptimizer {
    config: AcquisitionConfig,
}

impl AcquisitionOptimizer {
    pub fn new(config: AcquisitionConfig) -> Self {
        Self { config }
    }

    /// Propose the next candidate to evaluate.
    ///
    /// The result is clamped, has integer dimensions rounded and is checked
    /// against `space`. Ties go to the first point found.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        surrogate: &SurrogateModel,
        space: &HyperparameterSpace,
        kappa: f64,
        rng: &mut R,
    ) -> Result<Hyperparameters> {
        if space.is_empty() {
            return Err(TuningError::InvalidConfig(
                "cannot propose in an empty space".into(),
            ));
        }

        let dims = space.len();
        let acquisition = |u: &[f64]| {
            let (mean, std) = surrogate.query(&space.denormalize(u));
            upper_confidence_bound(mean, std, kappa)
        };

        // Dense phase
        let mut samples: Vec<(Vec<f64>, f64)> = (0..self.config.n_samples.max(1))
            .map(|_| {
                let u: Vec<f64> = (0..dims).map(|_| rng.gen::<f64>()).collect();
                let a = acquisition(&u);
                (u, a)
            })
            .collect();

        // Stable sort keeps the earliest sample first among equals
        samples.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let (mut best_u, mut best_a) = samples[0].clone();

        // Refinement phase
        for (start, start_a) in samples.into_iter().take(self.config.refine_starts) {
            let (u, a) = self.pattern_search(start, start_a, &acquisition);
            if a > best_a {
                best_u = u;
                best_a = a;
            }
        }

        let params = space.materialize(&space.denormalize(&best_u));
        space.check(&params)?;

        debug!(?params, acquisition = best_a, kappa, "candidate proposed");
        Ok(params)
    }

    fn pattern_search(
        &self,
        mut u: Vec<f64>,
        mut a: f64,
        acquisition: &impl Fn(&[f64]) -> f64,
    ) -> (Vec<f64>, f64) {
        let mut step = INITIAL_STEP;

        for _ in 0..self.config.refine_iterations {
            let mut improved = false;
            for dim in 0..u.len() {
                for direction in [1.0, -1.0] {
                    let mut trial = u.clone();
                    trial[dim] = (trial[dim] + direction * step).clamp(0.0, 1.0);
                    let trial_a = acquisition(&trial);
                    if trial_a > a {
                        u = trial;
                        a = trial_a;
                        improved = true;
                    }
                }
            }
            if !improved {
                step /= 2.0;
                if step < MIN_STEP {
                    break;
                }
            }
        }

        (u, a)
    }
}

impl Default for AcquisitionOptimizer {
    fn default() -> Self {
        Self::new(AcquisitionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::GaussianProcess;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tuning_api::SurrogateConfig;
    use tuning_spi::{CandidateRow, CandidateSet, Dimension, ParamKind, Phase, Score};

    fn space() -> HyperparameterSpace {
        HyperparameterSpace::new(vec![
            Dimension {
                name: "alpha".into(),
                kind: ParamKind::Continuous,
                lo: -0.004,
                hi: 0.094,
            },
            Dimension {
                name: "window".into(),
                kind: ParamKind::Integer,
                lo: 2.0,
                hi: 9.0,
            },
        ])
        .unwrap()
    }

    fn fitted(points: &[(f64, f64, f64)]) -> SurrogateModel {
        let mut set = CandidateSet::new();
        for &(alpha, window, score) in points {
            set.push(CandidateRow {
                params: Hyperparameters::new()
                    .with_param("alpha", alpha)
                    .with_param("window", window),
                score: Score::Scored(score),
                phase: Phase::Seed,
            });
        }
        GaussianProcess::new(SurrogateConfig {
            length_scale: Some(0.3),
            ..Default::default()
        })
        .fit(&set, &space())
        .unwrap()
    }

    #[test]
    fn test_ucb() {
        assert_eq!(upper_confidence_bound(-0.2, 0.1, 0.0), -0.2);
        assert!((upper_confidence_bound(-0.2, 0.1, 2.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_proposals_stay_in_bounds() {
        let surrogate = fitted(&[
            (0.0, 2.0, -0.4),
            (0.05, 5.0, -0.1),
            (0.09, 9.0, -0.3),
        ]);
        let optimizer = AcquisitionOptimizer::new(AcquisitionConfig {
            n_samples: 200,
            refine_starts: 3,
            refine_iterations: 20,
        });
        let space = space();
        let mut rng = StdRng::seed_from_u64(5);
        for kappa in [0.0, 0.1, 2.0, 10.0] {
            let params = optimizer.propose(&surrogate, &space, kappa, &mut rng).unwrap();
            assert!(space.check(&params).is_ok());
            assert_eq!(params.get("window").unwrap().fract(), 0.0);
        }
    }

    #[test]
    fn test_exploitation_finds_known_optimum() {
        let surrogate = fitted(&[
            (0.0, 2.0, -0.5),
            (0.045, 5.0, -0.05),
            (0.09, 9.0, -0.5),
        ]);
        let params = AcquisitionOptimizer::default()
            .propose(&surrogate, &space(), 0.0, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert!((params.get("alpha").unwrap() - 0.045).abs() < 0.015);
        assert!((params.get("window").unwrap() - 5.0).abs() <= 1.0);
    }

    #[test]
    fn test_deterministic_given_seed() {
        let surrogate = fitted(&[(0.01, 3.0, -0.3), (0.07, 7.0, -0.2)]);
        let optimizer = AcquisitionOptimizer::default();
        let a = optimizer
            .propose(&surrogate, &space(), 0.5, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let b = optimizer
            .propose(&surrogate, &space(), 0.5, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_surrogate_keeps_first_sample() {
        let space = space();
        let surrogate = GaussianProcess::default()
            .fit(&CandidateSet::new(), &space)
            .unwrap();

        let mut draws = StdRng::seed_from_u64(17);
        let first: Vec<f64> = (0..space.len()).map(|_| draws.gen::<f64>()).collect();
        let expected = space.materialize(&space.denormalize(&first));

        let params = AcquisitionOptimizer::default()
            .propose(&surrogate, &space, 0.1, &mut StdRng::seed_from_u64(17))
            .unwrap();
        assert_eq!(params, expected);
    }
}
