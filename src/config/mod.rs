//! Configuration for gradient boosting training.
//!
//! Provides the [`BoostConfig`] structure and builder used to set up a
//! [`GradientBoostingRegressor`](crate::boosting::GradientBoostingRegressor),
//! with fail-fast validation of every hyperparameter range.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StagewiseError};

/// Default maximum number of boosting rounds.
pub const DEFAULT_N_ESTIMATORS: usize = 100;
/// Default shrinkage applied to each booster's contribution.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Default fraction of the training partition subsampled each round.
pub const DEFAULT_SUBSAMPLE_RATIO: f64 = 0.5;
/// Default minimum change in training loss required to keep boosting.
pub const DEFAULT_MIN_CHANGE: f64 = 1e-4;
/// Default number of stagnant validation rounds tolerated before stopping.
pub const DEFAULT_WINDOW: usize = 5;
/// Default fraction of rows held out for validation scoring.
pub const DEFAULT_HOLD_OUT: f64 = 0.1;
/// Default maximum depth of the tree boosters.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Default random seed for shuffles and subsampling.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Hyperparameters for a gradient boosting run.
///
/// All ranges are validated by [`BoostConfig::validate`], which every
/// constructor path calls before any training can start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostConfig {
    /// Maximum number of boosting rounds (ensemble size upper bound)
    pub n_estimators: usize,
    /// Shrinkage multiplier applied to each booster's contribution, in (0, 1]
    pub learning_rate: f64,
    /// Fraction of the training partition drawn (without replacement) to fit
    /// each booster, in (0, 1]
    pub subsample_ratio: f64,
    /// Training-loss convergence threshold; boosting stops when the loss
    /// changes by less than this between rounds
    pub min_change: f64,
    /// Number of consecutive rounds without validation improvement tolerated
    /// before early stopping
    pub window: usize,
    /// Fraction of rows held out for validation scoring, in [0, 0.5].
    /// Zero disables validation scoring and early stopping on it.
    pub hold_out: f64,
    /// Maximum depth of the tree boosters
    pub max_depth: usize,
    /// Minimum number of samples required to split a tree node
    pub min_samples_split: usize,
    /// Minimum number of samples required in each leaf
    pub min_samples_leaf: usize,
    /// Seed for the random source driving shuffles and subsampling
    pub random_seed: u64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        BoostConfig {
            n_estimators: DEFAULT_N_ESTIMATORS,
            learning_rate: DEFAULT_LEARNING_RATE,
            subsample_ratio: DEFAULT_SUBSAMPLE_RATIO,
            min_change: DEFAULT_MIN_CHANGE,
            window: DEFAULT_WINDOW,
            hold_out: DEFAULT_HOLD_OUT,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: 2,
            min_samples_leaf: 1,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl BoostConfig {
    /// Create a configuration builder.
    pub fn builder() -> BoostConfigBuilder {
        BoostConfigBuilder::new()
    }

    /// Validate every hyperparameter range.
    ///
    /// Returns the first violation found, naming the parameter, the
    /// offending value, and the allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(StagewiseError::invalid_parameter(
                "n_estimators",
                self.n_estimators.to_string(),
                "must be at least 1",
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(StagewiseError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be in (0, 1]",
            ));
        }
        if !(self.subsample_ratio > 0.0 && self.subsample_ratio <= 1.0) {
            return Err(StagewiseError::invalid_parameter(
                "subsample_ratio",
                self.subsample_ratio.to_string(),
                "must be in (0, 1]",
            ));
        }
        if !(self.min_change >= 0.0) || !self.min_change.is_finite() {
            return Err(StagewiseError::invalid_parameter(
                "min_change",
                self.min_change.to_string(),
                "must be finite and non-negative",
            ));
        }
        if self.window == 0 {
            return Err(StagewiseError::invalid_parameter(
                "window",
                self.window.to_string(),
                "must be at least 1",
            ));
        }
        if !(self.hold_out >= 0.0 && self.hold_out <= 0.5) {
            return Err(StagewiseError::invalid_parameter(
                "hold_out",
                self.hold_out.to_string(),
                "must be in [0, 0.5]",
            ));
        }
        if self.max_depth == 0 {
            return Err(StagewiseError::invalid_parameter(
                "max_depth",
                self.max_depth.to_string(),
                "must be at least 1",
            ));
        }
        if self.min_samples_split < 2 {
            return Err(StagewiseError::invalid_parameter(
                "min_samples_split",
                self.min_samples_split.to_string(),
                "must be at least 2",
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(StagewiseError::invalid_parameter(
                "min_samples_leaf",
                self.min_samples_leaf.to_string(),
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Builder for [`BoostConfig`] with validation at build time.
#[derive(Debug, Clone, Default)]
pub struct BoostConfigBuilder {
    config: BoostConfig,
}

impl BoostConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        BoostConfigBuilder {
            config: BoostConfig::default(),
        }
    }

    /// Set the maximum number of boosting rounds.
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.config.n_estimators = n_estimators;
        self
    }

    /// Set the learning rate (shrinkage).
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    /// Set the per-round subsample fraction.
    pub fn subsample_ratio(mut self, subsample_ratio: f64) -> Self {
        self.config.subsample_ratio = subsample_ratio;
        self
    }

    /// Set the training-loss convergence threshold.
    pub fn min_change(mut self, min_change: f64) -> Self {
        self.config.min_change = min_change;
        self
    }

    /// Set the early-stopping patience window.
    pub fn window(mut self, window: usize) -> Self {
        self.config.window = window;
        self
    }

    /// Set the validation hold-out fraction.
    pub fn hold_out(mut self, hold_out: f64) -> Self {
        self.config.hold_out = hold_out;
        self
    }

    /// Set the maximum tree depth of the boosters.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the minimum samples required to split a node.
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.config.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum samples required in each leaf.
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.config.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the random seed.
    pub fn random_seed(mut self, random_seed: u64) -> Self {
        self.config.random_seed = random_seed;
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<BoostConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BoostConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_round_trip() {
        let config = BoostConfig::builder()
            .n_estimators(50)
            .learning_rate(0.05)
            .subsample_ratio(0.8)
            .hold_out(0.2)
            .random_seed(7)
            .build()
            .unwrap();

        assert_eq!(config.n_estimators, 50);
        assert_eq!(config.learning_rate, 0.05);
        assert_eq!(config.subsample_ratio, 0.8);
        assert_eq!(config.hold_out, 0.2);
        assert_eq!(config.random_seed, 7);
    }

    #[test]
    fn test_learning_rate_bounds() {
        for rate in [0.0, -0.1, 1.5, f64::NAN] {
            let result = BoostConfig::builder().learning_rate(rate).build();
            assert!(result.is_err(), "rate {} should be rejected", rate);
        }
        assert!(BoostConfig::builder().learning_rate(1.0).build().is_ok());
    }

    #[test]
    fn test_hold_out_bounds() {
        assert!(BoostConfig::builder().hold_out(0.0).build().is_ok());
        assert!(BoostConfig::builder().hold_out(0.5).build().is_ok());
        assert!(BoostConfig::builder().hold_out(0.51).build().is_err());
        assert!(BoostConfig::builder().hold_out(-0.1).build().is_err());
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let err = BoostConfig::builder().n_estimators(0).build().unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("n_estimators"));
        assert!(message.contains("at least 1"));
    }

    #[test]
    fn test_window_and_ratio_bounds() {
        assert!(BoostConfig::builder().window(0).build().is_err());
        assert!(BoostConfig::builder().subsample_ratio(0.0).build().is_err());
        assert!(BoostConfig::builder().subsample_ratio(1.0).build().is_ok());
        assert!(BoostConfig::builder().min_change(-1e-9).build().is_err());
    }
}
