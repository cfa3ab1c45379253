//! DiaGuard: diabetes risk prediction from eight health measurements.
//!
//! Fitted scaler and classifier parameters are loaded once into
//! [`ml::ModelArtifacts`] and borrowed by a stateless [`ml::Predictor`].

pub mod cli;
pub mod core;
pub mod ml;
pub mod monitoring;

pub use crate::core::{DiaGuardError, DiaGuardResult, PredictionError, Settings};
pub use crate::ml::{Diagnosis, FeatureVector, ModelArtifacts, PredictionResult, Predictor, RawValue};
