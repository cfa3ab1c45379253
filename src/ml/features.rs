use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::PredictionError;

pub const FEATURE_COUNT: usize = 8;

/// Health measurements in the column order the models were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Form metadata for a single field. Ranges are advisory for the UI only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Pregnancies => "pregnancies",
            Feature::Glucose => "glucose",
            Feature::BloodPressure => "blood_pressure",
            Feature::SkinThickness => "skin_thickness",
            Feature::Insulin => "insulin",
            Feature::Bmi => "bmi",
            Feature::DiabetesPedigreeFunction => "diabetes_pedigree_function",
            Feature::Age => "age",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn spec(&self) -> FieldSpec {
        let (label, unit, min, max, default, step) = match self {
            Feature::Pregnancies => ("Number of Pregnancies", None, 0.0, 20.0, 2.0, 1.0),
            Feature::Glucose => ("Glucose Level", Some("mg/dL"), 0.0, 300.0, 120.0, 1.0),
            Feature::BloodPressure => ("Blood Pressure", Some("mmHg"), 0.0, 200.0, 80.0, 1.0),
            Feature::SkinThickness => ("Skin Thickness", Some("mm"), 0.0, 100.0, 20.0, 1.0),
            Feature::Insulin => ("Insulin Level", Some("IU/mL"), 0.0, 1000.0, 85.0, 1.0),
            Feature::Bmi => ("BMI", Some("kg/m²"), 0.0, 100.0, 25.6, 0.1),
            Feature::DiabetesPedigreeFunction => {
                ("Diabetes Pedigree Function", None, 0.0, 2.5, 0.5, 0.01)
            }
            Feature::Age => ("Age", None, 0.0, 120.0, 35.0, 1.0),
        };

        FieldSpec { label, unit, min, max, default, step }
    }

    /// Whole-number fields in the form.
    pub fn is_integral(&self) -> bool {
        self.spec().step >= 1.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A form value before numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn coerce(&self, feature: Feature) -> Result<f64, PredictionError> {
        let value = match self {
            RawValue::Number(value) => *value,
            RawValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                PredictionError::InvalidInput(format!(
                    "{} must be numeric, got {:?}",
                    feature, text
                ))
            })?,
        };

        if !value.is_finite() {
            return Err(PredictionError::InvalidInput(format!(
                "{} must be a finite number, got {}",
                feature, value
            )));
        }

        Ok(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Eight coerced measurements, indexed by [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// The documented form defaults.
    pub fn defaults() -> Self {
        Self(Feature::ALL.map(|feature| feature.spec().default))
    }

    /// Coerces raw form values, rejecting anything that is not exactly eight numbers.
    pub fn from_raw(raw: &[RawValue]) -> Result<Self, PredictionError> {
        if raw.len() != FEATURE_COUNT {
            return Err(PredictionError::InvalidInput(format!(
                "expected {} values, got {}",
                FEATURE_COUNT,
                raw.len()
            )));
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (feature, value) in Feature::ALL.iter().zip(raw) {
            values[feature.index()] = value.coerce(*feature)?;
        }

        Ok(Self(values))
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().copied().zip(self.0.iter().copied())
    }
}
