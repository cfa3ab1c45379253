use anyhow::Result;
use diaguard::ml::{ArtifactFormat, Feature, FEATURE_COUNT};
use diaguard::{
    DiaGuardError, Diagnosis, FeatureVector, ModelArtifacts, PredictionError, Predictor, RawValue,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Integration Test Suite for the DiaGuard predictor
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn artifact_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts")
    }

    fn bundled() -> Result<ModelArtifacts> {
        let dir = artifact_dir();
        Ok(ModelArtifacts::load(
            &dir.join("scaler.json"),
            &dir.join("classifier.json"),
        )?)
    }

    fn raw(values: &[f64]) -> Vec<RawValue> {
        values.iter().copied().map(RawValue::Number).collect()
    }

    #[test]
    fn test_documented_defaults_classify() -> Result<()> {
        let artifacts = bundled()?;
        let predictor = Predictor::new(&artifacts);

        let result = predictor.classify(&raw(&[2.0, 120.0, 80.0, 20.0, 85.0, 25.6, 0.5, 35.0]))?;

        assert_eq!(result.diagnosis, Diagnosis::NotDiabetic);
        assert_eq!(result.advice(), None);
        Ok(())
    }

    #[test]
    fn test_reference_case_is_diabetic() -> Result<()> {
        let artifacts = bundled()?;
        let predictor = Predictor::new(&artifacts);

        let result = predictor.classify(&raw(&[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]))?;

        assert_eq!(result.diagnosis, Diagnosis::Diabetic);
        assert!(result.score > 0.0);
        assert!(result.advice().is_some());
        Ok(())
    }

    #[test]
    fn test_classification_is_deterministic() -> Result<()> {
        let artifacts = bundled()?;
        let predictor = Predictor::new(&artifacts);
        let input = raw(&[1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0]);

        let first = predictor.classify(&input)?;
        let second = predictor.classify(&input)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_valid_inputs_across_form_ranges_always_label() -> Result<()> {
        let artifacts = bundled()?;
        let predictor = Predictor::new(&artifacts);

        for step in 0..=10 {
            let fraction = f64::from(step) / 10.0;
            let values: Vec<f64> = Feature::ALL
                .iter()
                .map(|feature| {
                    let spec = feature.spec();
                    spec.min + (spec.max - spec.min) * fraction
                })
                .collect();

            let result = predictor.classify(&raw(&values))?;
            assert!(matches!(
                result.diagnosis,
                Diagnosis::Diabetic | Diagnosis::NotDiabetic
            ));
        }
        Ok(())
    }

    #[test]
    fn test_text_glucose_is_prediction_error() -> Result<()> {
        let artifacts = bundled()?;
        let predictor = Predictor::new(&artifacts);

        let mut input = raw(FeatureVector::defaults().as_slice());
        input[Feature::Glucose.index()] = RawValue::from("sweet");

        let err = predictor.classify(&input).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidInput(ref msg) if msg.contains("glucose")));
        Ok(())
    }

    #[test]
    fn test_short_vector_fails_before_classifier() -> Result<()> {
        // A classifier with the wrong width would report DimensionMismatch if reached.
        let mut artifacts = bundled()?;
        if let diaguard::ml::ClassifierModel::LinearSvc(model) = &mut artifacts.classifier {
            model.coefficients.truncate(3);
        }
        let predictor = Predictor::new(&artifacts);

        let err = predictor
            .classify(&raw(&[2.0, 120.0, 80.0, 20.0, 85.0, 25.6, 0.5]))
            .unwrap_err();

        assert!(matches!(err, PredictionError::InvalidInput(_)));
        Ok(())
    }

    #[test]
    fn test_mean_vector_standardizes_to_zero() -> Result<()> {
        let artifacts = bundled()?;
        let mean = artifacts
            .scaler
            .mean_vector()
            .expect("bundled scaler has eight means");

        let standardized = artifacts.scaler.transform(&mean)?;

        assert_eq!(standardized, [0.0; FEATURE_COUNT]);
        Ok(())
    }

    fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    const SCALER_TOML: &str = r#"
mean = [0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
scale = [1.0, 20.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
"#;

    const CLASSIFIER_YAML: &str = r#"
kind: logistic_regression
coefficients: [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
intercept: -2.0
"#;

    const CLASSIFIER_JSON5: &str = r#"{
  // exported from the offline fit
  kind: "linear_svc",
  coefficients: [0, 1, 0, 0, 0, 0, 0, 0],
  intercept: -2.0,
}"#;

    #[test]
    fn test_alternative_formats_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let scaler = write(dir.path(), "scaler.toml", SCALER_TOML)?;
        let yaml = write(dir.path(), "classifier.yaml", CLASSIFIER_YAML)?;
        let json5 = write(dir.path(), "classifier.json5", CLASSIFIER_JSON5)?;

        let logistic = ModelArtifacts::load(&scaler, &yaml)?;
        let result = Predictor::new(&logistic).classify_features(&FeatureVector::new([
            0.0, 180.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        ]))?;
        assert_eq!(result.diagnosis, Diagnosis::Diabetic);
        assert!(result.probability.is_some_and(|p| p > 0.5));

        let svc = ModelArtifacts::load(&scaler, &json5)?;
        assert_eq!(svc.classifier.kind(), "linear_svc");
        assert_eq!(ArtifactFormat::from_path(&json5), Some(ArtifactFormat::Json5));
        Ok(())
    }

    #[test_case("scaler.json", r#"{"mean": [1, 2, 3], "scale": [1, 1, 1]}"# ; "short mean")]
    #[test_case("scaler.json", r#"{"mean": [0,0,0,0,0,0,0,0], "scale": [1,1,1,1,0,1,1,1]}"# ; "zero scale")]
    #[test_case("scaler.pkl", r#"{"mean": [0,0,0,0,0,0,0,0], "scale": [1,1,1,1,1,1,1,1]}"# ; "unsupported extension")]
    #[test_case("scaler.json", "not a scaler" ; "corrupt")]
    fn test_bad_scaler_is_fatal(name: &str, content: &str) -> Result<()> {
        let dir = tempfile::tempdir()?;
        let scaler = write(dir.path(), name, content)?;

        let err = ModelArtifacts::load(&scaler, &artifact_dir().join("classifier.json"))
            .unwrap_err();

        assert!(matches!(err, DiaGuardError::ArtifactLoad { ref path, .. } if *path == scaler));
        Ok(())
    }

    #[test]
    fn test_classifier_with_foreign_labels_is_fatal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let classifier = write(
            dir.path(),
            "classifier.json",
            r#"{"kind": "linear_svc", "coefficients": [0,1,0,0,0,0,0,0], "intercept": 0.0, "classes": [-1, 2]}"#,
        )?;

        let err = ModelArtifacts::load(&artifact_dir().join("scaler.json"), &classifier).unwrap_err();

        assert!(matches!(err, DiaGuardError::ArtifactLoad { ref path, .. } if *path == classifier));
        assert!(err.to_string().contains("classes"));
        Ok(())
    }

    #[test]
    fn test_missing_classifier_is_fatal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let err = ModelArtifacts::load(
            &artifact_dir().join("scaler.json"),
            &dir.path().join("trained_model.json"),
        )
        .unwrap_err();

        assert!(matches!(err, DiaGuardError::ArtifactLoad { .. }));
        assert!(err.to_string().contains("trained_model.json"));
        Ok(())
    }
}
