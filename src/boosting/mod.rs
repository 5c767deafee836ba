//! Gradient boosting for regression.
//!
//! Implements stage-wise additive training: each round fits a fresh booster
//! to the residual gradients of the running prediction, shrinks its
//! contribution by the learning rate, and appends it to the ensemble.
//! Training stops early on a perfect validation score, a validation plateau,
//! training-loss convergence, or numerical instability, and rolls the
//! ensemble back to the best validated epoch when the final score regressed.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::BoostConfig;
use crate::core::error::{Result, StagewiseError};
use crate::core::traits::Metric;
use crate::core::types::{Epoch, StopReason, Value};
use crate::dataset::Dataset;
use crate::learners::{DecisionTreeRegressor, MeanRegressor, Regressor};
use crate::metrics::RSquared;

fn default_metric() -> Box<dyn Metric> {
    Box::new(RSquared)
}

/// Diagnostics from one training run.
///
/// Training-session data only: excluded from persisted models, which need
/// just the base learner, the ensemble, and the hyperparameters to predict.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingHistory {
    /// Training loss per completed round, in round order
    pub losses: Vec<(Epoch, Value)>,
    /// Validation score per round, in round order (empty without hold-out)
    pub scores: Vec<(Epoch, Value)>,
    /// Best validated round (0 when validation scoring was disabled)
    pub best_epoch: Epoch,
    /// Why training ended
    pub stop_reason: StopReason,
}

/// Transient state owned exclusively by one `fit` call.
///
/// Folded into the finalized model when the call returns, so a reader of the
/// model never observes a partially trained ensemble.
struct TrainingState {
    prev_out: Array1<Value>,
    prev_out_test: Option<Array1<Value>>,
    ensemble: Vec<Regressor>,
    losses: Vec<(Epoch, Value)>,
    scores: Vec<(Epoch, Value)>,
    best_score: Value,
    best_epoch: Epoch,
    stagnant_epochs: usize,
    previous_loss: Value,
    stop_reason: StopReason,
}

impl TrainingState {
    fn new(prev_out: Array1<Value>, prev_out_test: Option<Array1<Value>>, metric: &dyn Metric) -> Self {
        TrainingState {
            prev_out,
            prev_out_test,
            ensemble: Vec::new(),
            losses: Vec::new(),
            scores: Vec::new(),
            best_score: metric.worst_value(),
            best_epoch: 0,
            stagnant_epochs: 0,
            previous_loss: Value::INFINITY,
            stop_reason: StopReason::MaxRounds,
        }
    }

    /// Truncate the ensemble to the best validated epoch when the final
    /// recorded score is no better than the best score ever recorded.
    fn roll_back(&mut self, metric: &dyn Metric) {
        if let Some(&(_, last_score)) = self.scores.last() {
            if !metric.is_better(last_score, self.best_score) {
                log::info!(
                    "rolling ensemble back from {} to {} rounds (best {} {:.6})",
                    self.ensemble.len(),
                    self.best_epoch,
                    metric.name(),
                    self.best_score
                );
                self.ensemble.truncate(self.best_epoch);
            }
        }
    }

    fn into_history(self) -> (Vec<Regressor>, TrainingHistory) {
        let history = TrainingHistory {
            losses: self.losses,
            scores: self.scores,
            best_epoch: self.best_epoch,
            stop_reason: self.stop_reason,
        };
        (self.ensemble, history)
    }
}

/// Stage-wise gradient boosting ensemble regressor.
///
/// # Examples
///
/// ```rust,no_run
/// use ndarray::{Array1, Array2};
/// use stagewise::{BoostConfig, Dataset, GradientBoostingRegressor};
///
/// # fn main() -> stagewise::Result<()> {
/// let features = Array2::from_shape_fn((100, 1), |(i, _)| i as f64);
/// let labels = Array1::from_shape_fn(100, |i| 3.0 * i as f64);
/// let dataset = Dataset::new(features, labels)?;
///
/// let config = BoostConfig::builder()
///     .n_estimators(50)
///     .learning_rate(0.1)
///     .hold_out(0.2)
///     .build()?;
///
/// let mut model = GradientBoostingRegressor::new(config)?;
/// model.fit(&dataset)?;
/// let predictions = model.predict(&dataset)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    config: BoostConfig,
    /// Initial, unboosted estimator providing the starting prediction
    base: Regressor,
    /// Untrained prototype cloned at the start of every boosting round
    booster: Regressor,
    /// Trained boosters in training order
    ensemble: Vec<Regressor>,
    num_features: Option<usize>,
    #[serde(skip, default = "default_metric")]
    metric: Box<dyn Metric>,
    #[serde(skip)]
    history: Option<TrainingHistory>,
}

impl GradientBoostingRegressor {
    /// Create a regressor from a validated configuration.
    ///
    /// Defaults: constant-mean base learner, tree booster built from the
    /// configuration's tree hyperparameters, R² validation metric.
    pub fn new(config: BoostConfig) -> Result<Self> {
        config.validate()?;
        let booster = Regressor::Tree(DecisionTreeRegressor::new(
            config.max_depth,
            config.min_samples_split,
            config.min_samples_leaf,
        ));
        Ok(GradientBoostingRegressor {
            config,
            base: Regressor::Mean(MeanRegressor::new()),
            booster,
            ensemble: Vec::new(),
            num_features: None,
            metric: default_metric(),
            history: None,
        })
    }

    /// Replace the booster prototype.
    pub fn with_booster(mut self, booster: Regressor) -> Self {
        self.booster = booster.clone_untrained();
        self
    }

    /// Replace the base learner.
    pub fn with_base_learner(mut self, base: Regressor) -> Self {
        self.base = base.clone_untrained();
        self
    }

    /// Replace the validation metric.
    pub fn with_metric(mut self, metric: Box<dyn Metric>) -> Self {
        self.metric = metric;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &BoostConfig {
        &self.config
    }

    /// Number of boosters in the trained ensemble.
    pub fn ensemble_size(&self) -> usize {
        self.ensemble.len()
    }

    /// Whether the model can predict.
    pub fn is_trained(&self) -> bool {
        self.num_features.is_some() && !self.ensemble.is_empty()
    }

    /// Diagnostics from the most recent `fit` call, if any.
    pub fn training_history(&self) -> Option<&TrainingHistory> {
        self.history.as_ref()
    }

    /// Train the ensemble on a labeled dataset.
    ///
    /// Repeated calls retrain from scratch. On success the previous
    /// ensemble, feature count, and history are replaced atomically; on
    /// error the model is left exactly as it was.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        self.check_fit_preconditions(dataset)?;

        let mut rng = StdRng::seed_from_u64(self.config.random_seed);
        let mut working = dataset.clone();
        working.shuffle(&mut rng);
        let (train, valid) = working.split(1.0 - self.config.hold_out)?;

        let num_features = train.num_features();
        let train_labels = train.labels_checked()?.to_owned();
        let train_rows = train.num_rows();

        let mut base = self.base.clone_untrained();
        base.fit(&train)?;
        let prev_out = base.predict(&train)?;
        let prev_out_test = if valid.is_empty() {
            None
        } else {
            Some(base.predict(&valid)?)
        };

        let subsample_size =
            ((self.config.subsample_ratio * train_rows as f64).round() as usize).max(1);

        log::info!(
            "boosting: {} training rows, {} validation rows, {} features, subsample {}",
            train_rows,
            valid.num_rows(),
            num_features,
            subsample_size
        );

        let mut state = TrainingState::new(prev_out, prev_out_test, self.metric.as_ref());

        for epoch in 1..=self.config.n_estimators {
            let mut booster = self.booster.clone_untrained();

            // Residual gradient of squared-error loss w.r.t. the running output.
            let gradient = &train_labels - &state.prev_out;
            let loss = gradient.iter().map(|&g| g * g).sum::<Value>() / train_rows as Value;
            if !loss.is_finite() {
                log::warn!(
                    "epoch {}: non-finite training loss, stopping with {} rounds",
                    epoch,
                    state.ensemble.len()
                );
                state.stop_reason = StopReason::NonFiniteLoss;
                break;
            }

            // Same rows, gradient targets; row-index correspondence to the
            // training partition is preserved exactly.
            let synthetic = train.with_labels(gradient)?;
            let subsample = synthetic.random_subset(subsample_size, &mut rng)?;
            booster.fit(&subsample)?;
            let round_out = booster.predict(&train)?;
            let round_out_test = match &state.prev_out_test {
                Some(_) => Some(booster.predict(&valid)?),
                None => None,
            };

            let out = &round_out * self.config.learning_rate + &state.prev_out;
            state.losses.push((epoch, loss));
            state.ensemble.push(booster);
            log::debug!("epoch {}: loss {:.6}", epoch, loss);

            if let (Some(prev_out_test), Some(round_out_test)) =
                (state.prev_out_test.take(), round_out_test)
            {
                let out_test = &round_out_test * self.config.learning_rate + &prev_out_test;
                let score = self
                    .metric
                    .score(&out_test.view(), &valid.labels_checked()?)?;
                state.scores.push((epoch, score));
                log::debug!("epoch {}: {} {:.6}", epoch, self.metric.name(), score);

                if self.metric.is_perfect(score) {
                    state.stop_reason = StopReason::PerfectScore;
                    break;
                }
                if self.metric.is_better(score, state.best_score) {
                    state.best_score = score;
                    state.best_epoch = epoch;
                    state.stagnant_epochs = 0;
                } else {
                    state.stagnant_epochs += 1;
                }
                if state.stagnant_epochs >= self.config.window {
                    state.stop_reason = StopReason::Plateau;
                    break;
                }
                state.prev_out_test = Some(out_test);
            }

            if (state.previous_loss - loss).abs() < self.config.min_change {
                state.stop_reason = StopReason::LossConverged;
                break;
            }
            state.prev_out = out;
            state.previous_loss = loss;
        }

        state.roll_back(self.metric.as_ref());
        let (ensemble, history) = state.into_history();
        log::info!(
            "boosting finished: {} rounds kept ({})",
            ensemble.len(),
            history.stop_reason
        );

        self.base = base;
        self.ensemble = ensemble;
        self.num_features = Some(num_features);
        self.history = Some(history);
        Ok(())
    }

    /// Predict one value per row, in row order.
    ///
    /// Output is the base learner's prediction plus the shrunk contribution
    /// of every ensemble member, accumulated in training order.
    pub fn predict(&self, dataset: &Dataset) -> Result<Array1<Value>> {
        let num_features = self.trained_feature_count()?;
        if dataset.num_features() != num_features {
            return Err(StagewiseError::dimension_mismatch(
                format!("{} features", num_features),
                format!("{} features", dataset.num_features()),
            ));
        }

        let mut out = self.base.predict(dataset)?;
        for member in &self.ensemble {
            let contribution = member.predict(dataset)?;
            out.zip_mut_with(&contribution, |o, &c| {
                *o += self.config.learning_rate * c;
            });
        }
        Ok(out)
    }

    /// Elementwise mean of the ensemble members' feature importances.
    pub fn feature_importances(&self) -> Result<Array1<Value>> {
        let num_features = self.trained_feature_count()?;

        let mut total = Array1::zeros(num_features);
        for member in &self.ensemble {
            let importances = member.feature_importances().ok_or_else(|| {
                StagewiseError::prediction(format!(
                    "{} booster does not expose feature importances",
                    member.name()
                ))
            })?;
            if importances.len() != num_features {
                return Err(StagewiseError::dimension_mismatch(
                    format!("{} importances", num_features),
                    format!("{} importances", importances.len()),
                ));
            }
            total += &importances;
        }
        total /= self.ensemble.len() as Value;
        Ok(total)
    }

    fn trained_feature_count(&self) -> Result<usize> {
        let num_features = self.num_features.ok_or_else(|| {
            StagewiseError::not_trained("call fit() before predicting")
        })?;
        if self.ensemble.is_empty() {
            return Err(StagewiseError::not_trained(
                "training produced an empty ensemble",
            ));
        }
        Ok(num_features)
    }

    fn check_fit_preconditions(&self, dataset: &Dataset) -> Result<()> {
        let labels = dataset.labels_checked()?;
        if dataset.is_empty() {
            return Err(StagewiseError::dataset(
                "cannot train on an empty dataset (0 rows)",
            ));
        }
        if dataset.num_features() == 0 {
            return Err(StagewiseError::dataset(
                "cannot train on a dataset with 0 features",
            ));
        }
        if let Some(bad) = labels.iter().find(|l| !l.is_finite()) {
            return Err(StagewiseError::dataset(format!(
                "label {} is not a finite number; regression targets must be finite",
                bad
            )));
        }
        Ok(())
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        GradientBoostingRegressor::new(BoostConfig::default())
            .expect("default configuration is valid")
    }
}
