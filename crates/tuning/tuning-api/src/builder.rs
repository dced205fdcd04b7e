//! Tuner configuration builder.

use tuning_spi::{DimensionSpec, Result};

use crate::TuningConfig;

/// Builder for a validated [`TuningConfig`].
#[derive(Debug, Clone)]
pub struct TunerBuilder {
    config: TuningConfig,
}

impl TunerBuilder {
    pub fn new() -> Self {
        Self {
            config: TuningConfig::default(),
        }
    }

    // ========== Dimension Methods ==========

    /// Add a continuous dimension sampled uniformly from `[lo, hi]`.
    pub fn add_continuous(mut self, name: &str, lo: f64, hi: f64) -> Self {
        self.config
            .dimensions
            .push(DimensionSpec::continuous(name, lo, hi));
        self
    }

    /// Add an integer dimension sampled uniformly from `[lo, hi]`.
    pub fn add_integer(mut self, name: &str, lo: i64, hi: i64) -> Self {
        self.config.dimensions.push(DimensionSpec::integer(name, lo, hi));
        self
    }

    /// Add a continuous dimension drawn from two uniform sub-ranges.
    pub fn add_stratified(
        mut self,
        name: &str,
        low: (f64, f64),
        high: (f64, f64),
        low_share: f64,
    ) -> Self {
        self.config
            .dimensions
            .push(DimensionSpec::stratified(name, low, high, low_share));
        self
    }

    /// Add a fully specified dimension.
    pub fn add_dimension(mut self, spec: DimensionSpec) -> Self {
        self.config.dimensions.push(spec);
        self
    }

    // ========== Run Methods ==========

    pub fn seed_candidates(mut self, n: usize) -> Self {
        self.config.seed_candidates = n;
        self
    }

    pub fn iterations(mut self, n: usize) -> Self {
        self.config.iterations = n;
        self
    }

    /// UCB exploration weight; zero means pure exploitation.
    pub fn kappa(mut self, kappa: f64) -> Self {
        self.config.kappa = kappa;
        self
    }

    pub fn margin(mut self, margin: f64) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = seed;
        self
    }

    // ========== Fold Methods ==========

    /// Trailing fold schedule with `n_folds` cutoffs spaced by `step`.
    pub fn folds(mut self, n_folds: usize, step: Option<i64>) -> Self {
        self.config.folds.n_folds = n_folds;
        self.config.folds.step = step;
        self
    }

    pub fn min_train_points(mut self, n: usize) -> Self {
        self.config.folds.min_train_points = n;
        self
    }

    // ========== Surrogate / Acquisition Methods ==========

    pub fn length_scale(mut self, length_scale: f64) -> Self {
        self.config.surrogate.length_scale = Some(length_scale);
        self
    }

    pub fn noise_variance(mut self, noise: f64) -> Self {
        self.config.surrogate.noise_variance = noise;
        self
    }

    pub fn acquisition_samples(mut self, n: usize) -> Self {
        self.config.acquisition.n_samples = n;
        self
    }

    pub fn refinement(mut self, starts: usize, iterations: usize) -> Self {
        self.config.acquisition.refine_starts = starts;
        self.config.acquisition.refine_iterations = iterations;
        self
    }

    // ========== Build ==========

    pub fn config(&self) -> &TuningConfig {
        &self.config
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<TuningConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TunerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
