//! Trailing moving-average forecast.

use tuning_spi::{FittedModel, ForecastModel, ForecastPoint, Hyperparameters, ModelFitError, TimeSeries};

use super::{point, require_param, std_dev, Z_95};

/// Predicts the mean of the last `window` observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverageForecast;

impl MovingAverageForecast {
    pub const WINDOW: &'static str = "window";
}

struct FittedMovingAverage {
    mean: f64,
    spread: f64,
}

impl ForecastModel for MovingAverageForecast {
    fn fit(
        &self,
        series: &TimeSeries,
        params: &Hyperparameters,
    ) -> Result<Box<dyn FittedModel>, ModelFitError> {
        let window = require_param(params, Self::WINDOW)?.round();
        if window < 1.0 {
            return Err(ModelFitError::new(format!("window must be >= 1, got {}", window)));
        }
        let window = window as usize;

        let data = series.values();
        if data.len() < window {
            return Err(ModelFitError::new(format!(
                "window {} exceeds series length {}",
                window,
                data.len()
            )));
        }

        let tail = &data[data.len() - window..];
        Ok(Box::new(FittedMovingAverage {
            mean: tail.iter().sum::<f64>() / window as f64,
            spread: std_dev(tail),
        }))
    }

    fn name(&self) -> &str {
        "moving_average"
    }
}

impl FittedModel for FittedMovingAverage {
    fn predict(&self, future_timestamps: &[i64]) -> Result<Vec<ForecastPoint>, ModelFitError> {
        Ok(future_timestamps
            .iter()
            .map(|&t| point(t, self.mean, Z_95 * self.spread))
            .collect())
    }
}
