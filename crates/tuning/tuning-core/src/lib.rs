//! Hyperparameter Tuning Core
//!
//! Rolling-origin evaluation, random seeding, Gaussian-process surrogate,
//! UCB acquisition and the Bayesian optimization loop.

pub mod acquisition;
pub mod bayesian;
pub mod evaluator;
pub mod io;
pub mod metrics;
pub mod models;
pub mod runner;
pub mod sampler;
pub mod surrogate;

pub use acquisition::{upper_confidence_bound, AcquisitionOptimizer};
pub use bayesian::{BayesianOptimizer, TuningOutcome};
pub use evaluator::RollingOriginEvaluator;
pub use io::{
    load_candidates_json, load_series_csv, read_candidates_csv, save_candidates_json,
    write_candidates_csv,
};
pub use metrics::{absolute_percentage_error, mape};
pub use models::{HoltForecast, MovingAverageForecast, NaiveForecast};
pub use runner::Tuner;
pub use sampler::RandomGridSampler;
pub use surrogate::{GaussianProcess, SurrogateModel};

// Re-export SPI types
pub use tuning_spi::{
    CandidateRow, CandidateSet, DimensionSpec, FittedModel, FoldError, FoldOutcome, FoldSchedule,
    ForecastModel, ForecastPoint, HyperparameterSpace, Hyperparameters, ModelFitError, Phase,
    Result, Score, TimeSeries, TimeSeriesPoint, TuningError,
};

// Re-export API types
pub use tuning_api::{AcquisitionConfig, FoldConfig, SurrogateConfig, TunerBuilder, TuningConfig};
