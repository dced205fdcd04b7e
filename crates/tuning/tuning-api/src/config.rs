//! Tuning configuration.
//!
//! Every section has defaults so partial TOML/JSON documents are accepted.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tuning_spi::{DimensionSpec, Result, TuningError};

// ============================================================================
// Fold Configuration
// ============================================================================

/// Rolling-origin fold schedule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldConfig {
    /// Number of trailing cutoffs
    pub n_folds: usize,
    /// Spacing between cutoffs; the series period when unset
    pub step: Option<i64>,
    /// Folds with fewer training points are skipped
    pub min_train_points: usize,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            n_folds: 3,
            step: None,
            min_train_points: 2,
        }
    }
}

// ============================================================================
// Surrogate Configuration
// ============================================================================

/// Gaussian-process surrogate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrogateConfig {
    /// Fixed kernel length scale (unit-cube units); estimated when unset
    pub length_scale: Option<f64>,
    /// Candidate length scales searched by marginal likelihood
    pub length_scale_grid: Vec<f64>,
    /// Observation noise in standardized score units
    pub noise_variance: f64,
    /// Jitter escalations tried before giving up on a factorization
    pub max_jitter_attempts: usize,
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self {
            length_scale: None,
            length_scale_grid: vec![0.05, 0.1, 0.2, 0.3, 0.5, 1.0, 2.0],
            noise_variance: 1e-4,
            max_jitter_attempts: 6,
        }
    }
}

// ============================================================================
// Acquisition Configuration
// ============================================================================

/// UCB maximization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Dense random points scored per proposal
    pub n_samples: usize,
    /// Best dense points used as local refinement starts
    pub refine_starts: usize,
    /// Pattern-search iterations per start
    pub refine_iterations: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            refine_starts: 5,
            refine_iterations: 50,
        }
    }
}

// ============================================================================
// Tuning Configuration
// ============================================================================

/// Complete configuration of a tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub dimensions: Vec<DimensionSpec>,
    /// Random candidates evaluated during seeding
    pub seed_candidates: usize,
    /// Bayesian optimization iterations
    pub iterations: usize,
    /// UCB exploration weight
    pub kappa: f64,
    /// Fractional bound expansion around the seeded range
    pub margin: f64,
    /// Seed of the pseudo-random source
    pub rng_seed: u64,
    pub folds: FoldConfig,
    pub surrogate: SurrogateConfig,
    pub acquisition: AcquisitionConfig,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            dimensions: Vec::new(),
            seed_candidates: 20,
            iterations: 10,
            kappa: 0.1,
            margin: 0.2,
            rng_seed: 42,
            folds: FoldConfig::default(),
            surrogate: SurrogateConfig::default(),
            acquisition: AcquisitionConfig::default(),
        }
    }
}

impl TuningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, spec: DimensionSpec) -> Self {
        self.dimensions.push(spec);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed_candidates(mut self, n: usize) -> Self {
        self.seed_candidates = n;
        self
    }

    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| TuningError::Toml(e.to_string()))
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| TuningError::Json(e.to_string()))
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TuningError::Toml(e.to_string()))
    }

    /// Check ranges and internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(invalid("at least one dimension is required"));
        }
        let mut seen = HashSet::new();
        for spec in &self.dimensions {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(invalid(&format!("duplicate dimension '{}'", spec.name)));
            }
        }
        if !(self.kappa.is_finite() && self.kappa >= 0.0) {
            return Err(invalid("kappa must be a non-negative finite number"));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(invalid("margin must be a non-negative finite number"));
        }
        if self.folds.n_folds == 0 {
            return Err(invalid("folds.n_folds must be > 0"));
        }
        if self.folds.min_train_points == 0 {
            return Err(invalid("folds.min_train_points must be > 0"));
        }
        if matches!(self.folds.step, Some(step) if step <= 0) {
            return Err(invalid("folds.step must be positive"));
        }
        if !(self.surrogate.noise_variance.is_finite() && self.surrogate.noise_variance > 0.0) {
            return Err(invalid("surrogate.noise_variance must be > 0"));
        }
        if matches!(self.surrogate.length_scale, Some(l) if !(l.is_finite() && l > 0.0)) {
            return Err(invalid("surrogate.length_scale must be > 0"));
        }
        if self.surrogate.length_scale.is_none()
            && (self.surrogate.length_scale_grid.is_empty()
                || self
                    .surrogate
                    .length_scale_grid
                    .iter()
                    .any(|l| !(l.is_finite() && *l > 0.0)))
        {
            return Err(invalid(
                "surrogate.length_scale_grid must hold positive values when length_scale is unset",
            ));
        }
        if self.acquisition.n_samples == 0 {
            return Err(invalid("acquisition.n_samples must be > 0"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> TuningError {
    TuningError::InvalidConfig(msg.to_string())
}
