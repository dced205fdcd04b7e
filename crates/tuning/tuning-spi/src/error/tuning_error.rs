//! Tuning error types
//!
//! Two families of errors exist. [`TuningError`] aborts a run and is surfaced
//! to the caller. [`FoldError`] describes why a single cross-validation fold
//! produced no value; it is absorbed by the evaluator and only ever observed
//! through fold diagnostics.

use thiserror::Error;

/// Result type alias for tuning operations
pub type Result<T> = std::result::Result<T, TuningError>;

/// Fatal errors raised by the tuning engine.
#[derive(Error, Debug)]
pub enum TuningError {
    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data violates an ordering or finiteness requirement
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A proposed candidate escaped the hyperparameter space.
    ///
    /// Raised by the internal consistency check after acquisition; it points
    /// at an optimizer bug, never at a data condition.
    #[error("Value {value} for '{dimension}' outside bounds [{lo}, {hi}]")]
    OutOfBounds {
        dimension: String,
        value: f64,
        lo: f64,
        hi: f64,
    },

    /// Numerical failure in the surrogate (e.g. non positive-definite kernel)
    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("TOML error: {0}")]
    Toml(String),
}

/// Error reported by a forecast model capability when it cannot produce a
/// fitted model or a forecast.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Model fit failed: {0}")]
pub struct ModelFitError(pub String);

impl ModelFitError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Reasons a single fold is skipped.
///
/// None of these are fatal: the fold is excluded from the mean.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FoldError {
    /// Training window below the configured minimum
    #[error("Insufficient data: need at least {required} training points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Forecast model failed to fit or predict
    #[error(transparent)]
    ModelFit(#[from] ModelFitError),

    /// No observation exists at the cutoff timestamp
    #[error("No observation at cutoff {cutoff}")]
    MissingTestPoint { cutoff: i64 },

    /// Percentage error undefined for a zero actual
    #[error("Actual value at cutoff {cutoff} is zero")]
    ZeroActual { cutoff: i64 },
}
