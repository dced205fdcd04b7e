//! Hyperparameter Tuning Service Provider Interface
//!
//! Data model, error kinds and the forecast model capability shared by the
//! tuning crates. Contains no algorithms.

pub mod contract;
pub mod error;
pub mod model;

pub use contract::{FittedModel, ForecastModel, ForecastPoint};
pub use error::{FoldError, ModelFitError, Result, TuningError};
pub use model::{
    CandidateRow, CandidateSet, Dimension, DimensionSpec, FoldOutcome, FoldSchedule,
    HyperparameterSpace, Hyperparameters, ParamKind, Phase, SamplingDistribution, Score,
    TimeSeries, TimeSeriesPoint, UNSCORABLE_SENTINEL,
};
