//! Holt linear-trend exponential smoothing.
//!
//! `level_t = alpha * y_t + (1 - alpha) * (level_{t-1} + trend_{t-1})`
//! `trend_t = beta * (level_t - level_{t-1}) + (1 - beta) * trend_{t-1}`

use tuning_spi::{FittedModel, ForecastModel, ForecastPoint, Hyperparameters, ModelFitError, TimeSeries};

use super::{point, require_param, series_period, std_dev, steps_ahead, Z_95};

/// Holt's method with hyperparameters `alpha` (level) and `beta` (trend),
/// both in the open interval (0, 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct HoltForecast;

impl HoltForecast {
    pub const ALPHA: &'static str = "alpha";
    pub const BETA: &'static str = "beta";
}

struct FittedHolt {
    level: f64,
    trend: f64,
    last: i64,
    period: i64,
    residual_std: f64,
}

fn check_unit(name: &str, value: f64) -> Result<(), ModelFitError> {
    if !(0.0 < value && value < 1.0) {
        return Err(ModelFitError::new(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

impl ForecastModel for HoltForecast {
    fn fit(
        &self,
        series: &TimeSeries,
        params: &Hyperparameters,
    ) -> Result<Box<dyn FittedModel>, ModelFitError> {
        let alpha = require_param(params, Self::ALPHA)?;
        let beta = require_param(params, Self::BETA)?;
        check_unit(Self::ALPHA, alpha)?;
        check_unit(Self::BETA, beta)?;

        let data = series.values();
        if data.len() < 3 {
            return Err(ModelFitError::new(format!(
                "holt needs at least 3 points, got {}",
                data.len()
            )));
        }

        let mut level = data[0];
        let mut trend = data[1] - data[0];
        let mut residuals = Vec::with_capacity(data.len() - 1);

        for &value in &data[1..] {
            residuals.push(value - (level + trend));
            let prev_level = level;
            level = alpha * value + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        }

        if !level.is_finite() || !trend.is_finite() {
            return Err(ModelFitError::new("smoothing diverged"));
        }

        Ok(Box::new(FittedHolt {
            level,
            trend,
            last: series.last_timestamp().unwrap_or_default(),
            period: series_period(series),
            residual_std: std_dev(&residuals),
        }))
    }

    fn name(&self) -> &str {
        "holt"
    }
}

impl FittedModel for FittedHolt {
    fn predict(&self, future_timestamps: &[i64]) -> Result<Vec<ForecastPoint>, ModelFitError> {
        Ok(future_timestamps
            .iter()
            .map(|&t| {
                let h = steps_ahead(self.last, self.period, t);
                let estimate = self.level + h as f64 * self.trend;
                point(t, estimate, Z_95 * self.residual_std * (h as f64).sqrt())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(alpha: f64, beta: f64) -> Hyperparameters {
        Hyperparameters::new()
            .with_param(HoltForecast::ALPHA, alpha)
            .with_param(HoltForecast::BETA, beta)
    }

    #[test]
    fn test_holt_tracks_linear_trend() {
        let data: Vec<f64> = (0..10).map(|i| 10.0 + 2.0 * i as f64).collect();
        let series = TimeSeries::regular(0, 7, &data).unwrap();
        let fitted = HoltForecast.fit(&series, &params(0.5, 0.3)).unwrap();
        let forecast = fitted.predict(&[70, 84]).unwrap();
        assert!((forecast[0].estimate - 30.0).abs() < 1e-9);
        assert!((forecast[1].estimate - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_holt_rejects_bad_params() {
        let series = TimeSeries::regular(0, 1, &[1.0, 2.0, 3.0]).unwrap();
        assert!(HoltForecast.fit(&series, &params(0.0, 0.5)).is_err());
        assert!(HoltForecast.fit(&series, &params(0.5, 1.0)).is_err());
        assert!(HoltForecast
            .fit(&series, &Hyperparameters::new().with_param("alpha", 0.5))
            .is_err());
    }

    #[test]
    fn test_holt_needs_three_points() {
        let series = TimeSeries::regular(0, 1, &[1.0, 2.0]).unwrap();
        assert!(HoltForecast.fit(&series, &params(0.5, 0.5)).is_err());
    }
}
