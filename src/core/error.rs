use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaGuardError {
    #[error("Failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiaGuardError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Per-request failure. Never fatal; the form renders it and stays usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model error: {0}")]
    Model(String),
}

pub type DiaGuardResult<T> = Result<T, DiaGuardError>;
