//! Model persistence.
//!
//! Serializes trained models to bincode (compact default) or JSON
//! (human-readable). Only what prediction needs is persisted: the
//! configuration, the base learner, and the ensemble. Training histories are
//! session diagnostics and are never written.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::boosting::GradientBoostingRegressor;
use crate::core::error::{Result, StagewiseError};

/// On-disk model encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerializationFormat {
    /// Compact binary encoding (default)
    Bincode,
    /// Human-readable JSON encoding
    Json,
}

impl Default for SerializationFormat {
    fn default() -> Self {
        SerializationFormat::Bincode
    }
}

impl SerializationFormat {
    /// Pick a format from a path's extension: `.json` selects JSON,
    /// anything else the bincode default.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => SerializationFormat::Json,
            _ => SerializationFormat::Bincode,
        }
    }
}

/// Encode a model to bytes.
pub fn to_bytes(
    model: &GradientBoostingRegressor,
    format: SerializationFormat,
) -> Result<Vec<u8>> {
    match format {
        SerializationFormat::Bincode => Ok(bincode::serialize(model)?),
        SerializationFormat::Json => Ok(serde_json::to_vec_pretty(model)?),
    }
}

/// Decode a model from bytes.
pub fn from_bytes(
    bytes: &[u8],
    format: SerializationFormat,
) -> Result<GradientBoostingRegressor> {
    match format {
        SerializationFormat::Bincode => Ok(bincode::deserialize(bytes)?),
        SerializationFormat::Json => Ok(serde_json::from_slice(bytes)?),
    }
}

/// Write a model to a file in the given format.
pub fn save_model<P: AsRef<Path>>(
    path: P,
    model: &GradientBoostingRegressor,
    format: SerializationFormat,
) -> Result<()> {
    let bytes = to_bytes(model, format)?;
    fs::write(&path, bytes).map_err(|e| {
        StagewiseError::serialization(format!(
            "failed to write model to {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}

/// Read a model from a file in the given format.
pub fn load_model<P: AsRef<Path>>(
    path: P,
    format: SerializationFormat,
) -> Result<GradientBoostingRegressor> {
    let bytes = fs::read(&path).map_err(|e| {
        StagewiseError::serialization(format!(
            "failed to read model from {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    from_bytes(&bytes, format)
}
