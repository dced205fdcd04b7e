//! Rolling-origin cross-validation evaluator.

use tracing::debug;
use tuning_spi::{
    FoldError, FoldOutcome, FoldSchedule, ForecastModel, Hyperparameters, ModelFitError, Score,
    TimeSeries,
};

use crate::metrics::{absolute_percentage_error, mean};

/// Scores a hyperparameter vector by fitting the model on every fold's
/// training window and forecasting the point at the fold cutoff.
#[derive(Debug, Clone)]
pub struct RollingOriginEvaluator {
    min_train_points: usize,
}

impl RollingOriginEvaluator {
    pub fn new(min_train_points: usize) -> Self {
        Self {
            min_train_points: min_train_points.max(1),
        }
    }

    pub fn min_train_points(&self) -> usize {
        self.min_train_points
    }

    /// Aggregate score: negative mean APE over the folds that produced a
    /// value, or `Unscorable` when none did.
    pub fn evaluate(
        &self,
        model: &dyn ForecastModel,
        params: &Hyperparameters,
        dataset: &TimeSeries,
        schedule: &FoldSchedule,
    ) -> Score {
        let errors: Vec<f64> = self
            .evaluate_folds(model, params, dataset, schedule)
            .iter()
            .filter_map(FoldOutcome::ape)
            .collect();

        match mean(&errors) {
            Some(mape) => Score::Scored(-mape),
            None => Score::Unscorable,
        }
    }

    /// Per-fold outcomes in schedule order.
    pub fn evaluate_folds(
        &self,
        model: &dyn ForecastModel,
        params: &Hyperparameters,
        dataset: &TimeSeries,
        schedule: &FoldSchedule,
    ) -> Vec<FoldOutcome> {
        schedule
            .cutoffs()
            .iter()
            .map(|&cutoff| match self.evaluate_fold(model, params, dataset, cutoff) {
                Ok((actual, predicted, ape)) => FoldOutcome::Scored {
                    cutoff,
                    actual,
                    predicted,
                    ape,
                },
                Err(reason) => {
                    debug!(cutoff, model = model.name(), %reason, "fold skipped");
                    FoldOutcome::Skipped { cutoff, reason }
                }
            })
            .collect()
    }

    fn evaluate_fold(
        &self,
        model: &dyn ForecastModel,
        params: &Hyperparameters,
        dataset: &TimeSeries,
        cutoff: i64,
    ) -> Result<(f64, f64, f64), FoldError> {
        let train = dataset.before(cutoff);
        debug_assert!(train.last_timestamp().map_or(true, |t| t < cutoff));

        if train.len() < self.min_train_points {
            return Err(FoldError::InsufficientData {
                required: self.min_train_points,
                actual: train.len(),
            });
        }

        let actual = dataset
            .value_at(cutoff)
            .ok_or(FoldError::MissingTestPoint { cutoff })?;

        let fitted = model.fit(&train, params)?;
        let predicted = fitted
            .predict(&[cutoff])?
            .first()
            .map(|p| p.estimate)
            .ok_or_else(|| ModelFitError::new("model returned an empty forecast"))?;

        if !predicted.is_finite() {
            return Err(ModelFitError::new("model returned a non-finite forecast").into());
        }

        let ape = absolute_percentage_error(actual, predicted)
            .ok_or(FoldError::ZeroActual { cutoff })?;

        Ok((actual, predicted, ape))
    }
}

impl Default for RollingOriginEvaluator {
    fn default() -> Self {
        Self::new(2)
    }
}
