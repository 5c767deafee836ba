//! CART regression tree.
//!
//! Arena-allocated binary tree grown greedily by variance reduction. Used as
//! the default booster in gradient boosting, where each round fits one tree
//! to the residual gradients.

use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StagewiseError};
use crate::core::types::Value;
use crate::dataset::Dataset;

/// Node of a regression tree, stored in a flat arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split on `feature <= threshold`
    Split {
        feature: usize,
        threshold: Value,
        left: usize,
        right: usize,
        gain: Value,
        n_samples: usize,
    },
    /// Terminal node predicting a constant value
    Leaf { value: Value, n_samples: usize },
}

/// Candidate split produced by the per-feature search.
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: Value,
    gain: Value,
}

/// Gains within floating-point roundoff of the SSE computation are treated
/// as zero.
const MIN_GAIN: Value = 1e-12;

/// Greedy CART regression tree with variance-reduction splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    max_depth: usize,
    min_samples_split: usize,
    min_samples_leaf: usize,
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Create an unfitted tree with the given growth limits.
    pub fn new(max_depth: usize, min_samples_split: usize, min_samples_leaf: usize) -> Self {
        DecisionTreeRegressor {
            max_depth,
            min_samples_split,
            min_samples_leaf,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Maximum depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes in the fitted tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Fresh unfitted copy preserving the hyperparameters.
    pub fn clone_untrained(&self) -> Self {
        DecisionTreeRegressor::new(self.max_depth, self.min_samples_split, self.min_samples_leaf)
    }

    /// Grow the tree on a labeled dataset.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let labels = dataset.labels_checked()?;
        if dataset.is_empty() {
            return Err(StagewiseError::dataset(
                "cannot fit a regression tree on an empty dataset",
            ));
        }

        self.nodes.clear();
        self.n_features = dataset.num_features();

        let indices: Vec<usize> = (0..dataset.num_rows()).collect();
        self.build(dataset, &labels, indices, 0);
        Ok(())
    }

    /// Predict one value per row, in row order.
    pub fn predict(&self, dataset: &Dataset) -> Result<Array1<Value>> {
        if !self.is_fitted() {
            return Err(StagewiseError::not_trained(
                "regression tree has not been fitted",
            ));
        }
        if dataset.num_features() != self.n_features {
            return Err(StagewiseError::dimension_mismatch(
                format!("{} features", self.n_features),
                format!("{} features", dataset.num_features()),
            ));
        }
        let predictions: Vec<Value> = (0..dataset.num_rows())
            .map(|i| self.predict_row(&dataset.row(i)))
            .collect();
        Ok(Array1::from_vec(predictions))
    }

    /// Per-feature importance: split gains accumulated by feature and
    /// normalized to sum to one. A tree with no splits yields all zeros.
    pub fn feature_importances(&self) -> Array1<Value> {
        let mut importances = Array1::zeros(self.n_features);
        for node in &self.nodes {
            if let TreeNode::Split { feature, gain, .. } = node {
                importances[*feature] += gain.max(0.0);
            }
        }
        let total: Value = importances.sum();
        if total > 0.0 {
            importances.mapv_inplace(|g| g / total);
        }
        importances
    }

    fn predict_row(&self, row: &ArrayView1<'_, Value>) -> Value {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Recursively grow the subtree over `indices`, returning its arena slot.
    fn build(
        &mut self,
        dataset: &Dataset,
        labels: &ArrayView1<'_, Value>,
        indices: Vec<usize>,
        depth: usize,
    ) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| labels[i]).sum::<Value>() / n as Value;

        if depth >= self.max_depth || n < self.min_samples_split {
            return self.push_leaf(mean, n);
        }

        let split = match self.best_split(dataset, labels, &indices) {
            Some(split) if split.gain > MIN_GAIN => split,
            _ => return self.push_leaf(mean, n),
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| dataset.row(i)[split.feature] <= split.threshold);

        // Reserve the split slot before recursing so children land after it.
        let slot = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            value: mean,
            n_samples: n,
        });
        let left = self.build(dataset, labels, left_idx, depth + 1);
        let right = self.build(dataset, labels, right_idx, depth + 1);
        self.nodes[slot] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            gain: split.gain,
            n_samples: n,
        };
        slot
    }

    fn push_leaf(&mut self, value: Value, n_samples: usize) -> usize {
        self.nodes.push(TreeNode::Leaf { value, n_samples });
        self.nodes.len() - 1
    }

    /// Best variance-reduction split over all features, searched per feature
    /// in parallel. Returns None when no admissible split exists.
    fn best_split(
        &self,
        dataset: &Dataset,
        labels: &ArrayView1<'_, Value>,
        indices: &[usize],
    ) -> Option<SplitCandidate> {
        (0..dataset.num_features())
            .into_par_iter()
            .filter_map(|feature| self.best_split_on_feature(dataset, labels, indices, feature))
            .max_by(|a, b| {
                a.gain
                    .partial_cmp(&b.gain)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn best_split_on_feature(
        &self,
        dataset: &Dataset,
        labels: &ArrayView1<'_, Value>,
        indices: &[usize],
        feature: usize,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let mut pairs: Vec<(Value, Value)> = indices
            .iter()
            .map(|&i| (dataset.row(i)[feature], labels[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let total_sum: Value = pairs.iter().map(|&(_, y)| y).sum();
        let total_sq: Value = pairs.iter().map(|&(_, y)| y * y).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as Value;

        let mut best: Option<SplitCandidate> = None;
        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for k in 1..n {
            let (value, target) = pairs[k - 1];
            left_sum += target;
            left_sq += target * target;

            // No threshold can separate equal feature values.
            if value == pairs[k].0 {
                continue;
            }
            if k < self.min_samples_leaf || n - k < self.min_samples_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let left_sse = left_sq - left_sum * left_sum / k as Value;
            let right_sse = right_sq - right_sum * right_sum / (n - k) as Value;
            let gain = parent_sse - left_sse - right_sse;

            if best.map_or(true, |b| gain > b.gain) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (value + pairs[k].0) / 2.0,
                    gain,
                });
            }
        }
        best
    }
}
