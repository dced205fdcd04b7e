//! Data model types.

mod candidate;
mod fold;
mod series;
mod space;

pub use candidate::{CandidateRow, CandidateSet, Phase, Score, UNSCORABLE_SENTINEL};
pub use fold::{FoldOutcome, FoldSchedule};
pub use series::{TimeSeries, TimeSeriesPoint};
pub use space::{
    Dimension, DimensionSpec, HyperparameterSpace, Hyperparameters, ParamKind,
    SamplingDistribution,
};
