use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use super::artifact::ModelArtifacts;
use super::features::{FeatureVector, RawValue};
use crate::core::PredictionError;
use crate::track_performance;

/// Binary outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Diabetic,
    NotDiabetic,
}

pub const DIABETES_TIPS: [&str; 5] = [
    "Maintain a healthy diet (low sugar, high fiber).",
    "Engage in regular exercise (walking, yoga, etc.).",
    "Monitor blood sugar levels frequently.",
    "Stay hydrated and avoid processed foods.",
    "Follow medical advice and take prescribed medications.",
];

impl Diagnosis {
    pub fn message(&self) -> &'static str {
        match self {
            Diagnosis::Diabetic => {
                "The person is diabetic. Please follow a healthy lifestyle and consult a doctor."
            }
            Diagnosis::NotDiabetic => {
                "The person is not diabetic. Keep maintaining a healthy routine!"
            }
        }
    }

    /// Management tips, only offered for a positive result.
    pub fn advice(&self) -> Option<&'static [&'static str]> {
        match self {
            Diagnosis::Diabetic => Some(&DIABETES_TIPS[..]),
            Diagnosis::NotDiabetic => None,
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Diabetic => f.write_str("diabetic"),
            Diagnosis::NotDiabetic => f.write_str("not diabetic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub diagnosis: Diagnosis,
    pub message: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl PredictionResult {
    pub fn advice(&self) -> Option<&'static [&'static str]> {
        self.diagnosis.advice()
    }
}

/// Stateless classifier over a borrowed set of fitted artifacts.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    artifacts: &'a ModelArtifacts,
}

impl<'a> Predictor<'a> {
    pub fn new(artifacts: &'a ModelArtifacts) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &'a ModelArtifacts {
        self.artifacts
    }

    /// Coerce, standardize and classify eight raw form values.
    pub fn classify(&self, raw_inputs: &[RawValue]) -> Result<PredictionResult, PredictionError> {
        let result = FeatureVector::from_raw(raw_inputs)
            .and_then(|features| self.classify_features(&features));

        if let Err(ref e) = result {
            warn!(error = %e, "Prediction failed");
        }
        result
    }

    pub fn classify_features(
        &self,
        features: &FeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        track_performance!("classify");

        let standardized = self.artifacts.scaler.transform(features)?;
        let decision = self.artifacts.classifier.predict(&standardized)?;

        let diagnosis = if decision.label == 1 {
            Diagnosis::Diabetic
        } else {
            Diagnosis::NotDiabetic
        };

        debug!(score = decision.score, %diagnosis, "Classified feature vector");

        Ok(PredictionResult {
            diagnosis,
            message: diagnosis.message().to_string(),
            score: decision.score,
            probability: decision.probability,
        })
    }
}
