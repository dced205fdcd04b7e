//! Error types for hyperparameter tuning.

mod tuning_error;

pub use tuning_error::{FoldError, ModelFitError, Result, TuningError};
