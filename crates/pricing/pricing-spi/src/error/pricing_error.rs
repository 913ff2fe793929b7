//! Pricing error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur anywhere in the prediction pipeline
#[derive(Error, Debug)]
pub enum PricingError {
    /// The model artifact does not exist at the configured path
    #[error("Model artifact not found at {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The model artifact exists but cannot be used
    #[error("Invalid model artifact: {0}")]
    ArtifactFormat(String),

    /// The artifact was trained on a different feature layout
    #[error("Feature column mismatch: expected [{}], artifact has [{}]", expected.join(", "), actual.join(", "))]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A tensor did not have the shape an operation requires
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Scaler used before being fitted or restored
    #[error("Scaler must be fitted before transformation")]
    NotFitted,

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Filesystem error while reading or writing an artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact JSON could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    /// Shorthand for [`PricingError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PricingError::ShapeMismatch`].
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
