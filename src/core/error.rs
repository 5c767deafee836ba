//! Error handling and error types for the stagewise toolkit.
//!
//! This module provides the crate-wide error enum and `Result` alias used
//! throughout dataset handling, training, prediction, and persistence.

use std::io;
use thiserror::Error;

/// Main error type for the stagewise library.
///
/// Covers every failure mode that can occur during dataset construction,
/// configuration, model training, prediction, and persistence.
#[derive(Error, Debug)]
pub enum StagewiseError {
    /// Configuration and hyperparameter validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dataset construction and validation errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Invalid hyperparameter with offending value and allowed range
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Dimension mismatch between inputs
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Training-related errors
    #[error("Training error: {message}")]
    Training { message: String },

    /// Prediction requested on a model that has not been trained
    #[error("Model is not trained: {message}")]
    NotTrained { message: String },

    /// Prediction errors other than the untrained case
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Numerical computation errors (overflow, non-finite values)
    #[error("Numerical error: {message}")]
    Numerical { message: String },

    /// Model serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON encoding/decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Bincode encoding/decoding errors
    #[error("Bincode error: {source}")]
    Bincode {
        #[from]
        source: bincode::Error,
    },
}

/// Type alias for Results using StagewiseError
pub type Result<T> = std::result::Result<T, StagewiseError>;

impl StagewiseError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        StagewiseError::Config {
            message: message.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        StagewiseError::Dataset {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        StagewiseError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        StagewiseError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        StagewiseError::Training {
            message: message.into(),
        }
    }

    /// Create a not-trained error
    pub fn not_trained<S: Into<String>>(message: S) -> Self {
        StagewiseError::NotTrained {
            message: message.into(),
        }
    }

    /// Create a prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        StagewiseError::Prediction {
            message: message.into(),
        }
    }

    /// Create a numerical error
    pub fn numerical<S: Into<String>>(message: S) -> Self {
        StagewiseError::Numerical {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        StagewiseError::Serialization {
            message: message.into(),
        }
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            StagewiseError::Config { .. } => "config",
            StagewiseError::Dataset { .. } => "dataset",
            StagewiseError::InvalidParameter { .. } => "invalid_parameter",
            StagewiseError::DimensionMismatch { .. } => "dimension_mismatch",
            StagewiseError::Training { .. } => "training",
            StagewiseError::NotTrained { .. } => "not_trained",
            StagewiseError::Prediction { .. } => "prediction",
            StagewiseError::Numerical { .. } => "numerical",
            StagewiseError::Serialization { .. } => "serialization",
            StagewiseError::Io { .. } => "io",
            StagewiseError::Json { .. } => "json",
            StagewiseError::Bincode { .. } => "bincode",
        }
    }

    /// Check if this error is recoverable by retraining with the same inputs
    pub fn is_recoverable(&self) -> bool {
        match self {
            StagewiseError::Config { .. } => false,
            StagewiseError::Dataset { .. } => false,
            StagewiseError::InvalidParameter { .. } => false,
            StagewiseError::DimensionMismatch { .. } => false,
            StagewiseError::Training { .. } => true,
            StagewiseError::NotTrained { .. } => false,
            StagewiseError::Prediction { .. } => true,
            StagewiseError::Numerical { .. } => true,
            StagewiseError::Serialization { .. } => false,
            StagewiseError::Io { .. } => false,
            StagewiseError::Json { .. } => false,
            StagewiseError::Bincode { .. } => false,
        }
    }
}
