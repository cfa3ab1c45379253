// Machine Learning Module

pub mod artifact;
pub mod classifier;
pub mod features;
pub mod predictor;
pub mod scaler;

// Expose key types and functions
pub use artifact::{ArtifactFormat, ModelArtifacts};
pub use classifier::{ClassifierModel, Decision, LinearModel};
pub use features::{Feature, FeatureVector, FieldSpec, RawValue, FEATURE_COUNT};
pub use predictor::{Diagnosis, PredictionResult, Predictor, DIABETES_TIPS};
pub use scaler::ScalerModel;
