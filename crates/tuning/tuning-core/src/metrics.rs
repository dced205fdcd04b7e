//! Forecast error metrics.

/// Absolute percentage error `|actual - predicted| / |actual|`.
///
/// Undefined (`None`) for a zero actual or a non-finite input.
pub fn absolute_percentage_error(actual: f64, predicted: f64) -> Option<f64> {
    if !actual.is_finite() || !predicted.is_finite() || actual.abs() < 1e-12 {
        return None;
    }
    Some(((actual - predicted) / actual).abs())
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mean absolute percentage error over paired observations, ignoring
/// pairs where the percentage error is undefined.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter_map(|(&a, &p)| absolute_percentage_error(a, p))
        .collect();
    mean(&errors)
}
