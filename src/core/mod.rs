pub mod config;
pub mod error;

pub use config::{Settings, SettingsOverrides};
pub use error::{DiaGuardError, DiaGuardResult, PredictionError};
