//! # Stagewise
//!
//! A stage-wise gradient boosting machine learning toolkit in pure Rust:
//! dataset containers, weak learners, a gradient-boosting ensemble
//! regressor with early stopping, cross-validation strategies, and model
//! persistence.
//!
//! ## Features
//!
//! - **Gradient boosting**: stage-wise additive training over residual
//!   gradients with stochastic subsampling, learning-rate shrinkage,
//!   validation-based early stopping, and best-epoch rollback.
//! - **Weak learners**: CART regression trees with variance-reduction
//!   splits and a constant-mean base learner, behind one serializable
//!   learner seam.
//! - **Explicit metrics**: validation metrics declare their achievable
//!   range and direction, so lower-is-better metrics early-stop correctly.
//! - **Model persistence**: compact bincode or human-readable JSON, with
//!   training diagnostics excluded from the persisted state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ndarray::{Array1, Array2};
//! use stagewise::{BoostConfig, Dataset, GradientBoostingRegressor};
//!
//! # fn main() -> stagewise::Result<()> {
//! let features = Array2::from_shape_vec((4, 2), vec![
//!     1.0, 2.0,
//!     2.0, 3.0,
//!     3.0, 4.0,
//!     4.0, 5.0,
//! ]).expect("shape matches data");
//! let labels = Array1::from_vec(vec![3.0, 5.0, 7.0, 9.0]);
//! let dataset = Dataset::new(features, labels)?;
//!
//! let config = BoostConfig::builder()
//!     .n_estimators(100)
//!     .learning_rate(0.1)
//!     .hold_out(0.2)
//!     .build()?;
//!
//! let mut model = GradientBoostingRegressor::new(config)?;
//! model.fit(&dataset)?;
//!
//! let test = Dataset::unlabeled(Array2::from_shape_vec((2, 2), vec![
//!     5.0, 6.0,
//!     6.0, 7.0,
//! ]).expect("shape matches data"));
//! let predictions = model.predict(&test)?;
//! println!("predictions: {:?}", predictions);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: fundamental types, error handling, and the metric trait
//! - [`config`]: training hyperparameters with fail-fast validation
//! - [`dataset`]: in-memory dataset container and row operations
//! - [`learners`]: weak learners behind the `Regressor` seam
//! - [`metrics`]: regression metrics with explicit range and direction
//! - [`boosting`]: the gradient boosting trainer and predictor
//! - [`model_selection`]: hold-out splitting and k-fold cross-validation
//! - [`io`]: model serialization and persistence

#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

pub mod boosting;
pub mod config;
pub mod core;
pub mod dataset;
pub mod io;
pub mod learners;
pub mod metrics;
pub mod model_selection;

// Re-export core functionality for convenience
pub use crate::core::{
    error::{Result, StagewiseError},
    traits::Metric,
    types::{Epoch, FeatureIndex, FeatureType, StopReason, Value},
};

// Re-export configuration functionality
pub use config::{BoostConfig, BoostConfigBuilder};

// Re-export dataset functionality
pub use dataset::Dataset;

// Re-export learner functionality
pub use learners::{DecisionTreeRegressor, MeanRegressor, Regressor};

// Re-export metric implementations
pub use metrics::{MeanAbsoluteError, MeanSquaredError, RSquared};

// Re-export boosting functionality
pub use boosting::{GradientBoostingRegressor, TrainingHistory};

// Re-export model selection functionality
pub use model_selection::{cross_validate, train_test_split, CrossValidationResult, KFold};

// Re-export persistence functionality
pub use io::{from_bytes, load_model, save_model, to_bytes, SerializationFormat};
