use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::classifier::ClassifierModel;
use super::scaler::ScalerModel;
use crate::core::{DiaGuardError, DiaGuardResult};

/// Serialization formats accepted for exported model artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Json5,
    Toml,
    Yaml,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(ArtifactFormat::Json),
            "json5" => Some(ArtifactFormat::Json5),
            "toml" => Some(ArtifactFormat::Toml),
            "yaml" | "yml" => Some(ArtifactFormat::Yaml),
            _ => None,
        }
    }

    pub fn parse_str<T: DeserializeOwned>(&self, content: &str) -> Result<T, String> {
        match self {
            ArtifactFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ArtifactFormat::Json5 => json5::from_str(content).map_err(|e| e.to_string()),
            ArtifactFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ArtifactFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Read and deserialize one artifact, picking the format from the extension.
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> DiaGuardResult<T> {
    let format = ArtifactFormat::from_path(path)
        .ok_or_else(|| DiaGuardError::artifact(path, "unsupported file extension"))?;

    let content = fs::read_to_string(path).map_err(|e| DiaGuardError::artifact(path, e))?;
    debug!(path = %path.display(), ?format, bytes = content.len(), "Read artifact");

    format
        .parse_str(&content)
        .map_err(|reason| DiaGuardError::artifact(path, reason))
}

/// The fitted scaler and classifier, loaded once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub scaler: ScalerModel,
    pub classifier: ClassifierModel,
}

impl ModelArtifacts {
    pub fn new(scaler: ScalerModel, classifier: ClassifierModel) -> Self {
        Self { scaler, classifier }
    }

    pub fn load(scaler_path: &Path, classifier_path: &Path) -> DiaGuardResult<Self> {
        let scaler: ScalerModel = read_artifact(scaler_path)?;
        scaler
            .validate()
            .map_err(|reason| DiaGuardError::artifact(scaler_path, reason))?;

        let classifier: ClassifierModel = read_artifact(classifier_path)?;
        classifier
            .validate()
            .map_err(|reason| DiaGuardError::artifact(classifier_path, reason))?;

        info!(
            scaler = %scaler_path.display(),
            classifier = %classifier_path.display(),
            kind = classifier.kind(),
            "Model artifacts loaded"
        );

        Ok(Self::new(scaler, classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_case::test_case;

    #[test_case("scaler.json", Some(ArtifactFormat::Json))]
    #[test_case("scaler.JSON5", Some(ArtifactFormat::Json5))]
    #[test_case("model.toml", Some(ArtifactFormat::Toml))]
    #[test_case("model.yml", Some(ArtifactFormat::Yaml))]
    #[test_case("scaler.sav", None)]
    #[test_case("scaler", None)]
    fn test_format_from_extension(name: &str, expected: Option<ArtifactFormat>) {
        assert_eq!(ArtifactFormat::from_path(Path::new(name)), expected);
    }

    #[test]
    fn test_bundled_artifacts_load() {
        let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts");
        let artifacts =
            ModelArtifacts::load(&dir.join("scaler.json"), &dir.join("classifier.json")).unwrap();
        assert_eq!(artifacts.classifier.kind(), "linear_svc");
    }

    #[test]
    fn test_missing_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("scaler.json");
        let err = read_artifact::<ScalerModel>(&missing).unwrap_err();
        assert!(matches!(err, DiaGuardError::ArtifactLoad { path, .. } if path == missing));
    }

    #[test]
    fn test_corrupt_file_is_artifact_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            read_artifact::<ScalerModel>(file.path()),
            Err(DiaGuardError::ArtifactLoad { .. })
        ));
    }
}
