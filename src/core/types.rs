//! Core data types for the stagewise toolkit.
//!
//! Fundamental scalar aliases and enums shared across dataset handling,
//! training, and prediction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature and target value type. All numeric data in the toolkit is `f64`
/// so that loss accumulation stays stable over many boosting rounds.
pub type Value = f64;

/// Feature index type for identifying columns in the dataset.
pub type FeatureIndex = usize;

/// Boosting round number. Rounds are 1-based: round `k` produced the
/// ensemble's `k`-th member.
pub type Epoch = usize;

/// Feature data kinds a learner can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    /// Continuous numerical feature
    Continuous,
    /// Categorical feature encoded as numeric codes
    Categorical,
}

impl Default for FeatureType {
    fn default() -> Self {
        FeatureType::Continuous
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Continuous => write!(f, "continuous"),
            FeatureType::Categorical => write!(f, "categorical"),
        }
    }
}

/// Why a training run ended.
///
/// Recorded in the training history. None of these are errors: a non-finite
/// loss stops training gracefully and keeps the rounds completed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The configured maximum number of boosting rounds was reached
    MaxRounds,
    /// The validation score reached the metric's best achievable value
    PerfectScore,
    /// The validation score failed to improve for `window` consecutive rounds
    Plateau,
    /// The training loss changed by less than `min_change` between rounds
    LossConverged,
    /// The training loss became non-finite; the ensemble keeps the rounds
    /// completed before the instability
    NonFiniteLoss,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::MaxRounds => write!(f, "max rounds reached"),
            StopReason::PerfectScore => write!(f, "perfect validation score"),
            StopReason::Plateau => write!(f, "validation plateau"),
            StopReason::LossConverged => write!(f, "training loss converged"),
            StopReason::NonFiniteLoss => write!(f, "non-finite training loss"),
        }
    }
}
