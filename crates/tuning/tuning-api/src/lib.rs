//! Hyperparameter Tuning API
//!
//! Configuration types and builders for forecast hyperparameter tuning.

pub mod builder;
pub mod config;

pub use builder::*;
pub use config::*;

// Re-export SPI types
pub use tuning_spi::{
    CandidateRow, CandidateSet, DimensionSpec, HyperparameterSpace, Hyperparameters, ParamKind,
    Phase, Result, SamplingDistribution, Score, TuningError,
};
