//! Hyperparameter Tuning Facade
//!
//! Unified re-exports for forecast hyperparameter tuning.
//!
//! ```ignore
//! use tuning_facade::prelude::*;
//!
//! let config = TunerBuilder::new()
//!     .add_continuous("alpha", 0.05, 0.95)
//!     .add_continuous("beta", 0.01, 0.5)
//!     .build()?;
//! let outcome = Tuner::new(config)?.run(&HoltForecast, &series)?;
//! println!("best {:?} score {}", outcome.best.params, outcome.best.score.value());
//! ```

// Re-export everything from SPI
pub use tuning_spi::*;

// Re-export everything from API
pub use tuning_api::*;

// Re-export everything from Core
pub use tuning_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{FittedModel, ForecastModel, ForecastPoint, ModelFitError};
    pub use crate::{CandidateRow, CandidateSet, Phase, Score};
    pub use crate::{DimensionSpec, HyperparameterSpace, Hyperparameters};
    pub use crate::{FoldSchedule, TimeSeries, TimeSeriesPoint};
    pub use crate::{HoltForecast, MovingAverageForecast, NaiveForecast};
    pub use crate::{Result, TuningError};
    pub use crate::{Tuner, TunerBuilder, TuningConfig, TuningOutcome};
}
