use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{DiaGuardError, DiaGuardResult};

pub const DEFAULT_SCALER_PATH: &str = "artifacts/scaler.json";
pub const DEFAULT_CLASSIFIER_PATH: &str = "artifacts/classifier.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Name of the optional settings file looked up in the working directory.
const SETTINGS_FILE_STEM: &str = "diaguard";
const ENV_PREFIX: &str = "DIAGUARD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub scaler_path: PathBuf,
    pub classifier_path: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
            classifier_path: PathBuf::from(DEFAULT_CLASSIFIER_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Command line values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub scaler_path: Option<PathBuf>,
    pub classifier_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Settings {
    /// Layered load: defaults, then the settings file, then `DIAGUARD_*` variables.
    ///
    /// An explicit `path` must exist. Without one, `diaguard.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> DiaGuardResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE_STEM).required(false),
        };

        Config::builder()
            .set_default("scaler_path", DEFAULT_SCALER_PATH)
            .and_then(|b| b.set_default("classifier_path", DEFAULT_CLASSIFIER_PATH))
            .and_then(|b| b.set_default("log_level", DEFAULT_LOG_LEVEL))
            .map_err(|e| DiaGuardError::Config(e.to_string()))?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| DiaGuardError::Config(e.to_string()))
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(path) = overrides.scaler_path {
            self.scaler_path = path;
        }
        if let Some(path) = overrides.classifier_path {
            self.classifier_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    /// Serializes tests that read or write `DIAGUARD_*` variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_file_values_replace_defaults() {
        let _guard = env_lock();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "scaler_path = \"models/scaler.yaml\"").unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.scaler_path, PathBuf::from("models/scaler.yaml"));
        assert_eq!(settings.classifier_path, PathBuf::from(DEFAULT_CLASSIFIER_PATH));
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(DiaGuardError::Config(_))));
    }

    #[test]
    fn test_environment_layers_over_file_and_defaults() {
        let _guard = env_lock();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        env::set_var("DIAGUARD_LOG_LEVEL", "trace");
        env::set_var("DIAGUARD_SCALER_PATH", "/opt/models/scaler.toml");
        let settings = Settings::load(Some(file.path()));
        env::remove_var("DIAGUARD_LOG_LEVEL");
        env::remove_var("DIAGUARD_SCALER_PATH");

        let settings = settings.unwrap();
        assert_eq!(settings.log_level, "trace");
        assert_eq!(settings.scaler_path, PathBuf::from("/opt/models/scaler.toml"));
        assert_eq!(settings.classifier_path, PathBuf::from(DEFAULT_CLASSIFIER_PATH));
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::default().with_overrides(SettingsOverrides {
            classifier_path: Some(PathBuf::from("/tmp/clf.toml")),
            log_level: Some("warn".to_string()),
            ..Default::default()
        });

        assert_eq!(settings.scaler_path, PathBuf::from(DEFAULT_SCALER_PATH));
        assert_eq!(settings.classifier_path, PathBuf::from("/tmp/clf.toml"));
        assert_eq!(settings.log_level, "warn");
    }
}
