//! Trait abstractions for the stagewise toolkit.
//!
//! The metric seam lives here. The weak-learner seam is the
//! [`Regressor`](crate::learners::Regressor) enum in the `learners` module,
//! kept as enum dispatch so trained ensembles stay serializable.

use ndarray::ArrayView1;

use crate::core::error::Result;
use crate::core::types::Value;

/// A validation metric scoring predictions against true target values.
///
/// The direction of the metric is explicit: `higher_is_better` decides which
/// end of `range` is the best achievable value. Early stopping derives its
/// initial best score from `worst_value`, so lower-is-better metrics behave
/// correctly without any special casing in the trainer.
pub trait Metric: Send + Sync + std::fmt::Debug {
    /// Score predictions against targets. Inputs must have equal length.
    fn score(
        &self,
        predictions: &ArrayView1<'_, Value>,
        targets: &ArrayView1<'_, Value>,
    ) -> Result<Value>;

    /// The achievable score range as `(worst, best)` in the metric's own
    /// direction. Either bound may be infinite.
    fn range(&self) -> (Value, Value);

    /// Whether larger score values indicate better predictions.
    fn higher_is_better(&self) -> bool;

    /// The worst achievable score. Used to seed best-score tracking.
    fn worst_value(&self) -> Value {
        self.range().0
    }

    /// The best achievable score. Reaching it stops training immediately.
    fn best_value(&self) -> Value {
        self.range().1
    }

    /// Returns true when `candidate` is a strictly better score than
    /// `incumbent` in this metric's direction.
    fn is_better(&self, candidate: Value, incumbent: Value) -> bool {
        if self.higher_is_better() {
            candidate > incumbent
        } else {
            candidate < incumbent
        }
    }

    /// Returns true when `score` reaches or exceeds the best achievable
    /// value in this metric's direction.
    fn is_perfect(&self, score: Value) -> bool {
        if self.higher_is_better() {
            score >= self.best_value()
        } else {
            score <= self.best_value()
        }
    }

    /// Short metric name for logging.
    fn name(&self) -> &'static str;
}
