//! Naive (random walk) forecast.

use tuning_spi::{FittedModel, ForecastModel, ForecastPoint, Hyperparameters, ModelFitError, TimeSeries};

use super::{point, std_dev, Z_95};

/// Predicts the last observed value for every future timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveForecast;

struct FittedNaive {
    last: f64,
    step_std: f64,
}

impl ForecastModel for NaiveForecast {
    fn fit(
        &self,
        series: &TimeSeries,
        _params: &Hyperparameters,
    ) -> Result<Box<dyn FittedModel>, ModelFitError> {
        let values = series.values();
        let last = *values
            .last()
            .ok_or_else(|| ModelFitError::new("naive forecast needs at least one point"))?;
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Box::new(FittedNaive {
            last,
            step_std: std_dev(&diffs),
        }))
    }

    fn name(&self) -> &str {
        "naive"
    }
}

impl FittedModel for FittedNaive {
    fn predict(&self, future_timestamps: &[i64]) -> Result<Vec<ForecastPoint>, ModelFitError> {
        Ok(future_timestamps
            .iter()
            .map(|&t| point(t, self.last, Z_95 * self.step_std))
            .collect())
    }
}
