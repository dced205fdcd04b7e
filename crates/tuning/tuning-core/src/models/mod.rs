//! Reference forecast models
//!
//! Small models implementing the [`ForecastModel`](tuning_spi::ForecastModel)
//! capability. They cover the hyperparameter kinds the tuner supports:
//!
//! - **Naive**: last observed value, no hyperparameters
//! - **Holt**: linear-trend exponential smoothing (`alpha`, `beta`, continuous)
//! - **Moving average**: mean of the last `window` values (integer)

mod holt;
mod moving_average;
mod naive;

pub use holt::HoltForecast;
pub use moving_average::MovingAverageForecast;
pub use naive::NaiveForecast;

use tuning_spi::{ForecastPoint, Hyperparameters, ModelFitError, TimeSeries};

/// 95% normal quantile used for prediction intervals.
const Z_95: f64 = 1.96;

fn require_param(params: &Hyperparameters, name: &str) -> Result<f64, ModelFitError> {
    params
        .get(name)
        .ok_or_else(|| ModelFitError::new(format!("missing hyperparameter '{}'", name)))
}

/// Number of periods between the last training timestamp and `target`,
/// at least one.
fn steps_ahead(last: i64, period: i64, target: i64) -> usize {
    if period <= 0 || target <= last {
        return 1;
    }
    (((target - last) as f64 / period as f64).round() as usize).max(1)
}

fn series_period(series: &TimeSeries) -> i64 {
    series.period().unwrap_or(1)
}

fn point(timestamp: i64, estimate: f64, half_width: f64) -> ForecastPoint {
    ForecastPoint {
        timestamp,
        estimate,
        lower: estimate - half_width,
        upper: estimate + half_width,
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
