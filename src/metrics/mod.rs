//! Regression metrics for validation scoring.
//!
//! Implementations of the [`Metric`](crate::core::traits::Metric) trait used
//! by the boosting trainer for early stopping and by cross-validation. Each
//! metric declares its achievable range and direction explicitly.

use ndarray::ArrayView1;

use crate::core::error::{Result, StagewiseError};
use crate::core::traits::Metric;
use crate::core::types::Value;

fn validate_inputs(
    predictions: &ArrayView1<'_, Value>,
    targets: &ArrayView1<'_, Value>,
) -> Result<()> {
    if predictions.len() != targets.len() {
        return Err(StagewiseError::dimension_mismatch(
            format!("{} targets", predictions.len()),
            format!("{} targets", targets.len()),
        ));
    }
    if predictions.is_empty() {
        return Err(StagewiseError::dataset("cannot score empty predictions"));
    }
    Ok(())
}

/// Coefficient of determination. Higher is better, best value 1.0.
///
/// A model predicting the target mean scores 0; worse-than-mean models go
/// negative without bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct RSquared;

impl Metric for RSquared {
    fn score(
        &self,
        predictions: &ArrayView1<'_, Value>,
        targets: &ArrayView1<'_, Value>,
    ) -> Result<Value> {
        validate_inputs(predictions, targets)?;

        let mean = targets.sum() / targets.len() as Value;
        let ss_res: Value = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| (t - p) * (t - p))
            .sum();
        let ss_tot: Value = targets.iter().map(|&t| (t - mean) * (t - mean)).sum();

        if ss_tot == 0.0 {
            // Constant targets: perfect iff residuals vanish.
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }

    fn range(&self) -> (Value, Value) {
        (Value::NEG_INFINITY, 1.0)
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}

/// Mean squared error. Lower is better, best value 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl Metric for MeanSquaredError {
    fn score(
        &self,
        predictions: &ArrayView1<'_, Value>,
        targets: &ArrayView1<'_, Value>,
    ) -> Result<Value> {
        validate_inputs(predictions, targets)?;
        let sum: Value = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| (p - t) * (p - t))
            .sum();
        Ok(sum / predictions.len() as Value)
    }

    fn range(&self) -> (Value, Value) {
        (Value::INFINITY, 0.0)
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "mse"
    }
}

/// Mean absolute error. Lower is better, best value 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAbsoluteError;

impl Metric for MeanAbsoluteError {
    fn score(
        &self,
        predictions: &ArrayView1<'_, Value>,
        targets: &ArrayView1<'_, Value>,
    ) -> Result<Value> {
        validate_inputs(predictions, targets)?;
        let sum: Value = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| (p - t).abs())
            .sum();
        Ok(sum / predictions.len() as Value)
    }

    fn range(&self) -> (Value, Value) {
        (Value::INFINITY, 0.0)
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_r_squared_perfect_and_mean() {
        let targets = array![1.0, 2.0, 3.0, 4.0];
        let metric = RSquared;

        let score = metric.score(&targets.view(), &targets.view()).unwrap();
        assert_abs_diff_eq!(score, 1.0, epsilon = 1e-12);
        assert!(metric.is_perfect(score));

        let mean_pred = array![2.5, 2.5, 2.5, 2.5];
        let score = metric.score(&mean_pred.view(), &targets.view()).unwrap();
        assert_abs_diff_eq!(score, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r_squared_constant_targets() {
        let targets = array![5.0, 5.0, 5.0];
        let metric = RSquared;
        assert_eq!(metric.score(&targets.view(), &targets.view()).unwrap(), 1.0);

        let off = array![5.0, 5.0, 6.0];
        assert_eq!(metric.score(&off.view(), &targets.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_and_mae_values() {
        let predictions = array![1.0, 2.0, 3.0];
        let targets = array![2.0, 2.0, 5.0];

        let mse = MeanSquaredError
            .score(&predictions.view(), &targets.view())
            .unwrap();
        assert_abs_diff_eq!(mse, (1.0 + 0.0 + 4.0) / 3.0, epsilon = 1e-12);

        let mae = MeanAbsoluteError
            .score(&predictions.view(), &targets.view())
            .unwrap();
        assert_abs_diff_eq!(mae, (1.0 + 0.0 + 2.0) / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lower_is_better_direction() {
        let metric = MeanSquaredError;
        assert!(!metric.higher_is_better());
        assert!(metric.is_better(0.5, 1.0));
        assert!(metric.is_perfect(0.0));
        assert!(metric.worst_value().is_infinite());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let predictions = array![1.0, 2.0];
        let targets = array![1.0];
        assert!(RSquared
            .score(&predictions.view(), &targets.view())
            .is_err());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(MeanAbsoluteError.score(&empty.view(), &empty.view()).is_err());
    }
}
