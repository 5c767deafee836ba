//! Weak learners for gradient boosting.
//!
//! The learner seam is the [`Regressor`] enum: one variant per learner type,
//! dispatching fit/predict/clone/importance operations. Enum dispatch keeps
//! trained ensembles plain serde data, so persistence needs no trait-object
//! machinery.

pub mod mean;
pub mod tree;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Value;
use crate::dataset::Dataset;

pub use mean::MeanRegressor;
pub use tree::{DecisionTreeRegressor, TreeNode};

/// A trainable, predictable regression learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Regressor {
    /// Constant-mean regressor (default base learner)
    Mean(MeanRegressor),
    /// CART regression tree (default booster)
    Tree(DecisionTreeRegressor),
}

impl Regressor {
    /// Train on a labeled dataset.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        match self {
            Regressor::Mean(learner) => learner.fit(dataset),
            Regressor::Tree(learner) => learner.fit(dataset),
        }
    }

    /// Predict one value per row, in row order.
    pub fn predict(&self, dataset: &Dataset) -> Result<Array1<Value>> {
        match self {
            Regressor::Mean(learner) => learner.predict(dataset),
            Regressor::Tree(learner) => learner.predict(dataset),
        }
    }

    /// Fresh untrained instance preserving hyperparameters.
    pub fn clone_untrained(&self) -> Regressor {
        match self {
            Regressor::Mean(_) => Regressor::Mean(MeanRegressor::new()),
            Regressor::Tree(learner) => Regressor::Tree(learner.clone_untrained()),
        }
    }

    /// Per-feature importance vector, when this learner type exposes one.
    pub fn feature_importances(&self) -> Option<Array1<Value>> {
        match self {
            Regressor::Mean(_) => None,
            Regressor::Tree(learner) => Some(learner.feature_importances()),
        }
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        match self {
            Regressor::Mean(learner) => learner.is_fitted(),
            Regressor::Tree(learner) => learner.is_fitted(),
        }
    }

    /// Learner name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Regressor::Mean(_) => "mean",
            Regressor::Tree(_) => "tree",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn linear_dataset() -> Dataset {
        let features = Array2::from_shape_fn((12, 1), |(i, _)| i as f64);
        let labels = Array1::from_shape_fn(12, |i| 2.0 * i as f64);
        Dataset::new(features, labels).unwrap()
    }

    #[test]
    fn test_enum_dispatch_fit_predict() {
        let dataset = linear_dataset();
        let mut booster = Regressor::Tree(DecisionTreeRegressor::new(3, 2, 1));
        booster.fit(&dataset).unwrap();
        assert!(booster.is_fitted());
        assert_eq!(booster.predict(&dataset).unwrap().len(), 12);

        let mut base = Regressor::Mean(MeanRegressor::new());
        base.fit(&dataset).unwrap();
        assert_eq!(base.predict(&dataset).unwrap()[0], 11.0);
    }

    #[test]
    fn test_clone_untrained_is_unfitted() {
        let dataset = linear_dataset();
        let mut booster = Regressor::Tree(DecisionTreeRegressor::new(2, 2, 1));
        booster.fit(&dataset).unwrap();

        let clone = booster.clone_untrained();
        assert!(!clone.is_fitted());
        assert_eq!(clone.name(), "tree");
    }

    #[test]
    fn test_importances_only_for_trees() {
        let dataset = linear_dataset();
        let mut base = Regressor::Mean(MeanRegressor::new());
        base.fit(&dataset).unwrap();
        assert!(base.feature_importances().is_none());

        let mut booster = Regressor::Tree(DecisionTreeRegressor::new(2, 2, 1));
        booster.fit(&dataset).unwrap();
        assert!(booster.feature_importances().is_some());
    }
}
