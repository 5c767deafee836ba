//! Cross-validation strategies and dataset splitting helpers.
//!
//! Provides hold-out splitting, k-fold index generation, and a
//! `cross_validate` driver that scores a fresh regressor on every fold.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::boosting::GradientBoostingRegressor;
use crate::config::BoostConfig;
use crate::core::error::{Result, StagewiseError};
use crate::core::traits::Metric;
use crate::core::types::Value;
use crate::dataset::Dataset;

/// Split a dataset into shuffled train/test parts.
///
/// `test_fraction` rows (by count ratio) go to the test part.
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(StagewiseError::invalid_parameter(
            "test_fraction",
            test_fraction.to_string(),
            "must be in [0, 1)",
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut working = dataset.clone();
    working.shuffle(&mut rng);
    working.split(1.0 - test_fraction)
}

/// K-fold cross-validation index generator.
///
/// Every row appears in exactly one test fold; fold sizes differ by at most
/// one row.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Create a k-fold splitter with `n_splits >= 2` folds.
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(StagewiseError::invalid_parameter(
                "n_splits",
                n_splits.to_string(),
                "must be at least 2",
            ));
        }
        Ok(KFold {
            n_splits,
            shuffle: false,
            seed: 0,
        })
    }

    /// Shuffle row indices before folding.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    /// Number of folds.
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Produce `(train_indices, test_indices)` pairs over `n_rows` rows.
    pub fn split(&self, n_rows: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if n_rows < self.n_splits {
            return Err(StagewiseError::dataset(format!(
                "cannot split {} rows into {} folds",
                n_rows, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed);
            indices.shuffle(&mut rng);
        }

        // First n_rows % n_splits folds take one extra row.
        let base = n_rows / self.n_splits;
        let remainder = n_rows % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < remainder);
            let test: Vec<usize> = indices[start..start + size].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[start + size..].iter())
                .copied()
                .collect();
            folds.push((train, test));
            start += size;
        }
        Ok(folds)
    }
}

/// Per-fold scores from a cross-validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidationResult {
    /// Score on each fold's test part, in fold order
    pub fold_scores: Vec<Value>,
}

impl CrossValidationResult {
    /// Mean score over folds.
    pub fn mean(&self) -> Value {
        self.fold_scores.iter().sum::<Value>() / self.fold_scores.len() as Value
    }

    /// Population standard deviation of the fold scores.
    pub fn std_dev(&self) -> Value {
        let mean = self.mean();
        let variance = self
            .fold_scores
            .iter()
            .map(|&s| (s - mean) * (s - mean))
            .sum::<Value>()
            / self.fold_scores.len() as Value;
        variance.sqrt()
    }
}

/// Train and score a fresh regressor on every fold.
pub fn cross_validate(
    config: &BoostConfig,
    dataset: &Dataset,
    kfold: &KFold,
    metric: &dyn Metric,
) -> Result<CrossValidationResult> {
    dataset.labels_checked()?;

    let mut fold_scores = Vec::with_capacity(kfold.n_splits());
    for (fold, (train_idx, test_idx)) in kfold.split(dataset.num_rows())?.into_iter().enumerate() {
        let train = dataset.select_rows(&train_idx);
        let test = dataset.select_rows(&test_idx);

        let mut model = GradientBoostingRegressor::new(config.clone())?;
        model.fit(&train)?;
        let predictions = model.predict(&test)?;
        let score = metric.score(&predictions.view(), &test.labels_checked()?)?;
        log::debug!("fold {}: {} {:.6}", fold, metric.name(), score);
        fold_scores.push(score);
    }
    Ok(CrossValidationResult { fold_scores })
}
