use serde::{Deserialize, Serialize};

use super::features::{Feature, FeatureVector, FEATURE_COUNT};
use crate::core::PredictionError;

/// Standardization parameters fitted offline. Never refitted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerModel {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl ScalerModel {
    /// Checks the invariants a loaded scaler must hold.
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT {
            return Err(format!(
                "mean has {} entries, expected {}",
                self.mean.len(),
                FEATURE_COUNT
            ));
        }
        if self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "scale has {} entries, expected {}",
                self.scale.len(),
                FEATURE_COUNT
            ));
        }
        if let Some(position) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("mean of {} is not finite", Feature::ALL[position]));
        }
        if let Some(position) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(format!(
                "scale of {} must be finite and non-zero",
                Feature::ALL[position]
            ));
        }
        if let Some(names) = &self.feature_names {
            let expected: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(format!(
                    "feature_names {:?} do not match expected order {:?}",
                    names, expected
                ));
            }
        }
        Ok(())
    }

    /// `(raw[i] - mean[i]) / scale[i]` for every feature.
    pub fn transform(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], PredictionError> {
        let width = if self.mean.len() != FEATURE_COUNT {
            self.mean.len()
        } else {
            self.scale.len()
        };
        if width != FEATURE_COUNT {
            return Err(PredictionError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: width,
            });
        }

        let mut standardized = [0.0; FEATURE_COUNT];
        for (i, raw) in features.as_slice().iter().enumerate() {
            standardized[i] = (raw - self.mean[i]) / self.scale[i];
        }
        Ok(standardized)
    }

    pub fn mean_vector(&self) -> Option<FeatureVector> {
        let values: [f64; FEATURE_COUNT] = self.mean.as_slice().try_into().ok()?;
        Some(FeatureVector::new(values))
    }
}
