use serde::{Deserialize, Serialize};

use super::features::FEATURE_COUNT;
use crate::core::PredictionError;

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// Weights of a fitted linear decision function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Label for a non-positive score first, for a positive score second.
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
}

/// Binary classifier kinds that can be exported from the offline fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    LinearSvc(LinearModel),
    LogisticRegression(LinearModel),
}

/// Outcome of the decision function for one standardized vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub label: i64,
    pub score: f64,
    pub probability: Option<f64>,
}

impl ClassifierModel {
    fn linear(&self) -> &LinearModel {
        match self {
            ClassifierModel::LinearSvc(model) | ClassifierModel::LogisticRegression(model) => model,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierModel::LinearSvc(_) => "linear_svc",
            ClassifierModel::LogisticRegression(_) => "logistic_regression",
        }
    }

    pub fn classes(&self) -> [i64; 2] {
        self.linear().classes
    }

    pub fn validate(&self) -> Result<(), String> {
        let model = self.linear();
        if model.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "coefficients has {} entries, expected {}",
                model.coefficients.len(),
                FEATURE_COUNT
            ));
        }
        if model.coefficients.iter().any(|c| !c.is_finite()) || !model.intercept.is_finite() {
            return Err("decision parameters must be finite".to_string());
        }
        let mut classes = model.classes;
        classes.sort_unstable();
        if classes != [0, 1] {
            return Err(format!("classes must be 0 and 1, got {:?}", model.classes));
        }
        Ok(())
    }

    /// `Σ coef·x + intercept`.
    pub fn decision_function(&self, standardized: &[f64]) -> Result<f64, PredictionError> {
        let model = self.linear();
        if standardized.len() != model.coefficients.len() {
            return Err(PredictionError::DimensionMismatch {
                expected: model.coefficients.len(),
                actual: standardized.len(),
            });
        }

        let score = model
            .coefficients
            .iter()
            .zip(standardized)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + model.intercept;

        if !score.is_finite() {
            return Err(PredictionError::Model(format!(
                "decision function produced {}",
                score
            )));
        }
        Ok(score)
    }

    /// Positive class when the score is strictly above zero.
    pub fn predict(&self, standardized: &[f64]) -> Result<Decision, PredictionError> {
        let score = self.decision_function(standardized)?;
        let [negative, positive] = self.linear().classes;

        let probability = match self {
            ClassifierModel::LogisticRegression(_) => Some(1.0 / (1.0 + (-score).exp())),
            ClassifierModel::LinearSvc(_) => None,
        };

        Ok(Decision {
            label: if score > 0.0 { positive } else { negative },
            score,
            probability,
        })
    }
}
