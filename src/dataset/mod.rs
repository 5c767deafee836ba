//! Dataset container for the stagewise toolkit.
//!
//! Holds a row-major feature matrix plus optional regression targets, and
//! provides the row operations the boosting trainer consumes: in-place
//! shuffling, ratio splits, random subsampling without replacement, and
//! relabeling with gradient targets.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StagewiseError};
use crate::core::types::Value;

/// In-memory dataset: an `n_rows x n_features` matrix with optional labels.
///
/// Invariants enforced at construction: when labels are present their length
/// equals the number of rows, and every row shares one feature count (by
/// `Array2` construction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    features: Array2<Value>,
    labels: Option<Array1<Value>>,
}

impl Dataset {
    /// Create a labeled dataset.
    pub fn new(features: Array2<Value>, labels: Array1<Value>) -> Result<Self> {
        if labels.len() != features.nrows() {
            return Err(StagewiseError::dimension_mismatch(
                format!("{} labels (one per row)", features.nrows()),
                format!("{} labels", labels.len()),
            ));
        }
        Ok(Dataset {
            features,
            labels: Some(labels),
        })
    }

    /// Create an unlabeled dataset (prediction input).
    pub fn unlabeled(features: Array2<Value>) -> Self {
        Dataset {
            features,
            labels: None,
        }
    }

    /// Number of rows (samples).
    pub fn num_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns.
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    /// Whether this dataset carries labels.
    pub fn is_labeled(&self) -> bool {
        self.labels.is_some()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }

    /// Feature matrix view.
    pub fn features(&self) -> ArrayView2<'_, Value> {
        self.features.view()
    }

    /// Labels view, when present.
    pub fn labels(&self) -> Option<ArrayView1<'_, Value>> {
        self.labels.as_ref().map(|l| l.view())
    }

    /// Labels view, failing when the dataset is unlabeled.
    pub fn labels_checked(&self) -> Result<ArrayView1<'_, Value>> {
        self.labels
            .as_ref()
            .map(|l| l.view())
            .ok_or_else(|| StagewiseError::dataset("dataset has no labels"))
    }

    /// Single row view.
    pub fn row(&self, index: usize) -> ArrayView1<'_, Value> {
        self.features.row(index)
    }

    /// Shuffle rows in place (labels stay paired with their rows).
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let mut indices: Vec<usize> = (0..self.num_rows()).collect();
        indices.shuffle(rng);
        self.features = self.features.select(Axis(0), &indices);
        if let Some(labels) = &self.labels {
            self.labels = Some(labels.select(Axis(0), &indices));
        }
    }

    /// Split by row-count ratio: the first dataset receives
    /// `round(ratio * n_rows)` rows, the second the rest. Row order is
    /// preserved within each part.
    pub fn split(&self, ratio: f64) -> Result<(Dataset, Dataset)> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(StagewiseError::invalid_parameter(
                "ratio",
                ratio.to_string(),
                "must be in [0, 1]",
            ));
        }
        let n = self.num_rows();
        let first_rows = ((ratio * n as f64).round() as usize).min(n);
        let first_idx: Vec<usize> = (0..first_rows).collect();
        let rest_idx: Vec<usize> = (first_rows..n).collect();
        Ok((self.take_rows(&first_idx), self.take_rows(&rest_idx)))
    }

    /// Draw `n` rows uniformly at random without replacement.
    pub fn random_subset<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Dataset> {
        let rows = self.num_rows();
        if n == 0 || n > rows {
            return Err(StagewiseError::invalid_parameter(
                "n",
                n.to_string(),
                format!("must be in [1, {}] for this dataset", rows),
            ));
        }
        // Partial Fisher-Yates over an index pool: the first n entries end
        // up being a uniform draw without replacement.
        let mut pool: Vec<usize> = (0..rows).collect();
        for i in 0..n {
            let j = rng.gen_range(i..rows);
            pool.swap(i, j);
        }
        pool.truncate(n);
        Ok(self.take_rows(&pool))
    }

    /// Produce a dataset over the same feature rows with replacement labels.
    ///
    /// Row-index correspondence to this dataset is preserved exactly: row i
    /// of the result is row i of `self` labeled with `labels[i]`.
    pub fn with_labels(&self, labels: Array1<Value>) -> Result<Dataset> {
        Dataset::new(self.features.clone(), labels)
    }

    /// Dataset over the given rows, in the given order. Indices must be in
    /// bounds; duplicates are allowed (rows are copied).
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        self.take_rows(indices)
    }

    fn take_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self
                .labels
                .as_ref()
                .map(|l| l.select(Axis(0), indices)),
        }
    }
}
