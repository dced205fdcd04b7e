//! Capability contracts.

mod forecast_model;

pub use forecast_model::{FittedModel, ForecastModel, ForecastPoint};
