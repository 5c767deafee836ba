//! Constant-mean regressor.
//!
//! The default base learner for gradient boosting: predicts the mean of the
//! training targets for every row.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StagewiseError};
use crate::core::types::Value;
use crate::dataset::Dataset;

/// Regressor that predicts the training-target mean for every input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanRegressor {
    mean: Option<Value>,
}

impl MeanRegressor {
    /// Create an unfitted mean regressor.
    pub fn new() -> Self {
        MeanRegressor { mean: None }
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Fit to the dataset's labels.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let labels = dataset.labels_checked()?;
        if labels.is_empty() {
            return Err(StagewiseError::dataset(
                "cannot fit a mean regressor on an empty dataset",
            ));
        }
        self.mean = Some(labels.sum() / labels.len() as Value);
        Ok(())
    }

    /// Predict the fitted mean for every row.
    pub fn predict(&self, dataset: &Dataset) -> Result<Array1<Value>> {
        let mean = self.mean.ok_or_else(|| {
            StagewiseError::not_trained("mean regressor has not been fitted")
        })?;
        Ok(Array1::from_elem(dataset.num_rows(), mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_fit_predict_mean() {
        let dataset = Dataset::new(
            Array2::zeros((4, 2)),
            array![1.0, 2.0, 3.0, 6.0],
        )
        .unwrap();
        let mut learner = MeanRegressor::new();
        learner.fit(&dataset).unwrap();

        let predictions = learner.predict(&dataset).unwrap();
        assert_eq!(predictions, array![3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let learner = MeanRegressor::new();
        let dataset = Dataset::unlabeled(Array2::zeros((2, 1)));
        let err = learner.predict(&dataset).unwrap_err();
        assert_eq!(err.category(), "not_trained");
    }

    #[test]
    fn test_fit_unlabeled_fails() {
        let mut learner = MeanRegressor::new();
        let dataset = Dataset::unlabeled(Array2::zeros((2, 1)));
        assert!(learner.fit(&dataset).is_err());
    }
}
