//! Gaussian-process surrogate over observed candidate scores.
//!
//! Inputs are mapped to the unit cube of the current hyperparameter space
//! and targets are standardized before fitting. The posterior is computed
//! through a Cholesky factorization of `K + noise * I`; matrices are stored
//! row-major in flat vectors.

use std::f64::consts::PI;

use tracing::debug;
use tuning_api::SurrogateConfig;
use tuning_spi::{CandidateSet, HyperparameterSpace, Result, Score, TuningError};

/// Fits a fresh [`SurrogateModel`] from a candidate set.
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    config: SurrogateConfig,
}

/// Posterior of a fitted Gaussian process.
#[derive(Debug, Clone)]
pub struct SurrogateModel {
    space: HyperparameterSpace,
    x_train: Vec<Vec<f64>>,
    /// Lower Cholesky factor of `K + noise * I`
    chol: Vec<f64>,
    /// `(K + noise * I)^-1 y`
    alpha: Vec<f64>,
    length_scale: f64,
    y_mean: f64,
    y_std: f64,
    log_marginal_likelihood: f64,
}

struct Factorization {
    chol: Vec<f64>,
    alpha: Vec<f64>,
    log_marginal_likelihood: f64,
}

impl GaussianProcess {
    pub fn new(config: SurrogateConfig) -> Self {
        Self { config }
    }

    /// Full refit over every row of `candidates`.
    pub fn fit(&self, candidates: &CandidateSet, space: &HyperparameterSpace) -> Result<SurrogateModel> {
        let mut x_train = Vec::with_capacity(candidates.len());
        for row in candidates.rows() {
            let raw = space
                .dimensions()
                .iter()
                .map(|d| {
                    row.params.get(&d.name).ok_or_else(|| {
                        TuningError::InvalidData(format!("candidate is missing '{}'", d.name))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            x_train.push(space.normalize(&raw));
        }

        let scores: Vec<Score> = candidates.rows().iter().map(|r| r.score).collect();
        let (y, y_mean, y_std) = standardize(&scores);

        if x_train.is_empty() {
            return Ok(SurrogateModel {
                space: space.clone(),
                x_train,
                chol: Vec::new(),
                alpha: Vec::new(),
                length_scale: self.config.length_scale.unwrap_or(1.0),
                y_mean,
                y_std,
                log_marginal_likelihood: 0.0,
            });
        }

        let grid = match self.config.length_scale {
            Some(l) => vec![l],
            None => self.config.length_scale_grid.clone(),
        };

        let mut best: Option<(f64, Factorization)> = None;
        for &length_scale in &grid {
            match self.factorize(&x_train, &y, length_scale) {
                Some(f) => {
                    let better = best
                        .as_ref()
                        .map_or(true, |(_, b)| f.log_marginal_likelihood > b.log_marginal_likelihood);
                    if better {
                        best = Some((length_scale, f));
                    }
                }
                None => debug!(length_scale, "kernel matrix not positive definite"),
            }
        }

        let (length_scale, f) = best.ok_or_else(|| {
            TuningError::Numerical(format!(
                "kernel matrix not positive definite for any length scale in {:?}",
                grid
            ))
        })?;

        debug!(
            n = x_train.len(),
            length_scale,
            lml = f.log_marginal_likelihood,
            "surrogate fitted"
        );

        Ok(SurrogateModel {
            space: space.clone(),
            x_train,
            chol: f.chol,
            alpha: f.alpha,
            length_scale,
            y_mean,
            y_std,
            log_marginal_likelihood: f.log_marginal_likelihood,
        })
    }

    /// Factorize with escalating jitter on failure.
    fn factorize(&self, x: &[Vec<f64>], y: &[f64], length_scale: f64) -> Option<Factorization> {
        let n = x.len();
        let noise = self.config.noise_variance;

        for attempt in 0..=self.config.max_jitter_attempts {
            let jitter = if attempt == 0 {
                0.0
            } else {
                noise * 10f64.powi(attempt as i32)
            };

            let mut k = vec![0.0; n * n];
            for i in 0..n {
                for j in 0..=i {
                    let v = rbf_kernel(&x[i], &x[j], length_scale);
                    k[i * n + j] = v;
                    k[j * n + i] = v;
                }
                k[i * n + i] += noise + jitter;
            }

            if let Some(chol) = cholesky(&k, n) {
                let alpha = solve_upper_transposed(&chol, &solve_lower(&chol, y, n), n);
                let data_fit: f64 = y.iter().zip(&alpha).map(|(a, b)| a * b).sum();
                let log_det: f64 = (0..n).map(|i| chol[i * n + i].ln()).sum();
                let lml = -0.5 * data_fit - log_det - 0.5 * n as f64 * (2.0 * PI).ln();
                return Some(Factorization {
                    chol,
                    alpha,
                    log_marginal_likelihood: lml,
                });
            }
        }
        None
    }
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self::new(SurrogateConfig::default())
    }
}

impl SurrogateModel {
    /// Posterior mean and standard deviation, in score units, at a point
    /// expressed in hyperparameter units.
    pub fn query(&self, x: &[f64]) -> (f64, f64) {
        self.query_unit(&self.space.normalize(x))
    }

    /// Same as [`query`](Self::query) for a point already in the unit cube.
    pub fn query_unit(&self, u: &[f64]) -> (f64, f64) {
        let n = self.x_train.len();
        if n == 0 {
            return (self.y_mean, self.y_std);
        }

        let k_star: Vec<f64> = self
            .x_train
            .iter()
            .map(|xi| rbf_kernel(u, xi, self.length_scale))
            .collect();

        let mean: f64 = k_star.iter().zip(&self.alpha).map(|(k, a)| k * a).sum();
        let v = solve_lower(&self.chol, &k_star, n);
        let variance = (1.0 - v.iter().map(|x| x * x).sum::<f64>()).max(1e-12);

        (self.y_mean + self.y_std * mean, self.y_std * variance.sqrt())
    }

    pub fn space(&self) -> &HyperparameterSpace {
        &self.space
    }

    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    pub fn log_marginal_likelihood(&self) -> f64 {
        self.log_marginal_likelihood
    }

    pub fn n_observations(&self) -> usize {
        self.x_train.len()
    }
}

/// Squared-exponential kernel with unit signal variance.
pub fn rbf_kernel(x1: &[f64], x2: &[f64], length_scale: f64) -> f64 {
    let sq_dist: f64 = x1.iter().zip(x2).map(|(a, b)| (a - b).powi(2)).sum();
    (-sq_dist / (2.0 * length_scale * length_scale)).exp()
}

/// Standardize scores; unscorable rows sit one unit below the worst
/// scored row.
fn standardize(scores: &[Score]) -> (Vec<f64>, f64, f64) {
    let observed: Vec<f64> = scores
        .iter()
        .filter_map(|s| match s {
            Score::Scored(v) if v.is_finite() => Some(*v),
            _ => None,
        })
        .collect();

    let (mean, std) = if observed.is_empty() {
        (0.0, 1.0)
    } else {
        let mean = observed.iter().sum::<f64>() / observed.len() as f64;
        let var = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / observed.len() as f64;
        let std = var.sqrt();
        (mean, if std > 1e-12 { std } else { 1.0 })
    };

    let floor = observed
        .iter()
        .map(|v| (v - mean) / std)
        .fold(0.0_f64, f64::min)
        - 1.0;

    let y = scores
        .iter()
        .map(|s| match s {
            Score::Scored(v) if v.is_finite() => (v - mean) / std,
            _ => floor,
        })
        .collect();

    (y, mean, std)
}

/// Lower Cholesky factor of a symmetric positive-definite `n x n` matrix.
fn cholesky(a: &[f64], n: usize) -> Option<Vec<f64>> {
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i * n + i] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }
    Some(l)
}

/// Solve `L x = b` by forward substitution.
fn solve_lower(l: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut x = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[i * n + k] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }
    x
}

/// Solve `L^T x = b` by back substitution.
fn solve_upper_transposed(l: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for k in (i + 1)..n {
            sum -= l[k * n + i] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }
    x
}
