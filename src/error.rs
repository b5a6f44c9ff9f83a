use thiserror::Error;

use crate::distributions::DistributionError;

/// Errors raised while analysing salary groups.
///
/// Public entry points that must always hand the caller something
/// renderable (see [`crate::hypothesis::compare`]) convert these into a
/// verdict instead of returning them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: '{category}' has {found} observations, at least {required} needed")]
    InsufficientData {
        category: String,
        found: usize,
        required: usize,
    },

    #[error("Unrecognized category: '{category}' has no rows in the current data")]
    UnrecognizedCategory { category: String },

    #[error("Unrecognized variable: '{0}'")]
    UnrecognizedVariable(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<DistributionError> for AnalysisError {
    fn from(err: DistributionError) -> Self {
        AnalysisError::Computation(err.to_string())
    }
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
