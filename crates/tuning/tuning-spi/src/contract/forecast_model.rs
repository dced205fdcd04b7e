//! Forecast model capability consumed by the tuner.
//!
//! The tuner never looks inside a model. It only fits one per fold and asks
//! the fitted model for a point forecast at the fold cutoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use tuning_spi::{ForecastModel, Hyperparameters, TimeSeries};
//!
//! fn one_step<M: ForecastModel>(model: &M, train: &TimeSeries, params: &Hyperparameters, at: i64)
//!     -> Result<f64, tuning_spi::ModelFitError>
//! {
//!     let fitted = model.fit(train, params)?;
//!     Ok(fitted.predict(&[at])?[0].estimate)
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ModelFitError;
use crate::model::{Hyperparameters, TimeSeries};

/// One forecast point with its prediction interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: i64,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A forecasting model that can be fitted under a hyperparameter vector.
pub trait ForecastModel {
    /// Fit on a training series.
    ///
    /// Fails with [`ModelFitError`] on degenerate input, e.g. too few
    /// points or a singular optimisation.
    fn fit(
        &self,
        series: &TimeSeries,
        params: &Hyperparameters,
    ) -> Result<Box<dyn FittedModel>, ModelFitError>;

    /// Human-readable model name used in logs.
    fn name(&self) -> &str;
}

/// A fitted model ready to forecast.
pub trait FittedModel {
    /// Forecast each requested future timestamp, in order.
    fn predict(&self, future_timestamps: &[i64]) -> Result<Vec<ForecastPoint>, ModelFitError>;
}
