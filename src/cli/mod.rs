pub mod interactive;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

use crate::core::{DiaGuardError, DiaGuardResult, PredictionError, Settings, SettingsOverrides};
use crate::ml::{Feature, ModelArtifacts, PredictionResult, Predictor, RawValue};
use interactive::PredictionForm;

#[derive(Parser, Debug)]
#[command(name = "diaguard", author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML). Defaults to ./diaguard.toml when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the fitted scaler artifact
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Path to the fitted classifier artifact
    #[arg(long, global = true)]
    pub classifier: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Fill in the health form interactively (default)
    Form,
    /// Classify one set of measurements and exit
    Predict(PredictArgs),
    /// Show the form fields with their ranges and defaults
    Fields,
}

/// Measurements for a one-shot prediction. Unset fields use the form defaults.
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct PredictArgs {
    /// All eight values in form order; replaces the per-field flags
    #[arg(
        value_name = "VALUES",
        num_args = 0..,
        allow_negative_numbers = true,
        conflicts_with_all = [
            "pregnancies",
            "glucose",
            "blood_pressure",
            "skin_thickness",
            "insulin",
            "bmi",
            "diabetes_pedigree_function",
            "age",
        ]
    )]
    pub values: Vec<String>,

    #[arg(long)]
    pub pregnancies: Option<String>,
    #[arg(long)]
    pub glucose: Option<String>,
    #[arg(long)]
    pub blood_pressure: Option<String>,
    #[arg(long)]
    pub skin_thickness: Option<String>,
    #[arg(long)]
    pub insulin: Option<String>,
    #[arg(long)]
    pub bmi: Option<String>,
    #[arg(long)]
    pub diabetes_pedigree_function: Option<String>,
    #[arg(long)]
    pub age: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    fn field(&self, feature: Feature) -> Option<&String> {
        match feature {
            Feature::Pregnancies => self.pregnancies.as_ref(),
            Feature::Glucose => self.glucose.as_ref(),
            Feature::BloodPressure => self.blood_pressure.as_ref(),
            Feature::SkinThickness => self.skin_thickness.as_ref(),
            Feature::Insulin => self.insulin.as_ref(),
            Feature::Bmi => self.bmi.as_ref(),
            Feature::DiabetesPedigreeFunction => self.diabetes_pedigree_function.as_ref(),
            Feature::Age => self.age.as_ref(),
        }
    }

    /// Raw values handed to the predictor, uncoerced.
    pub fn raw_values(&self) -> Vec<RawValue> {
        if !self.values.is_empty() {
            return self.values.iter().cloned().map(RawValue::Text).collect();
        }

        Feature::ALL
            .iter()
            .map(|feature| match self.field(*feature) {
                Some(value) => RawValue::Text(value.clone()),
                None => RawValue::Number(feature.spec().default),
            })
            .collect()
    }
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            scaler_path: self.scaler.clone(),
            classifier_path: self.classifier.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Dispatch the parsed command.
pub fn run(command: Commands, settings: &Settings) -> Result<ExitCode> {
    match command {
        Commands::Fields => {
            print!("{}", render_fields());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Predict(args) => {
            let artifacts = match load_artifacts(settings, false) {
                Ok(artifacts) => artifacts,
                Err(e) => return Ok(report_fatal(&e)),
            };
            let predictor = Predictor::new(&artifacts);
            let outcome = predictor.classify(&args.raw_values());

            if args.json {
                let json = match &outcome {
                    Ok(result) => serde_json::to_string_pretty(result),
                    Err(e) => serde_json::to_string_pretty(
                        &serde_json::json!({ "error": e.to_string() }),
                    ),
                }
                .context("Failed to serialize prediction")?;
                println!("{}", json);
            } else {
                print!("{}", render_outcome(&outcome));
            }

            Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Form => {
            let artifacts = match load_artifacts(settings, true) {
                Ok(artifacts) => artifacts,
                Err(e) => return Ok(report_fatal(&e)),
            };
            PredictionForm::new(Predictor::new(&artifacts)).run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_artifacts(settings: &Settings, show_spinner: bool) -> DiaGuardResult<ModelArtifacts> {
    let spinner = show_spinner.then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("Loading model and scaler...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });

    let result = ModelArtifacts::load(&settings.scaler_path, &settings.classifier_path);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result
}

fn report_fatal(err: &DiaGuardError) -> ExitCode {
    error!(error = %err, "Startup failed");
    eprintln!(
        "{}",
        style(format!("Error loading model or scaler: {}", err)).red().bold()
    );
    ExitCode::FAILURE
}

/// Status line plus, for a positive result, the advisory block.
pub fn render_outcome(outcome: &Result<PredictionResult, PredictionError>) -> String {
    match outcome {
        Ok(result) => {
            let mut out = format!("{}\n", style(&result.message).green().bold());
            if let Some(tips) = result.advice() {
                out.push_str(&format!(
                    "\n{}\n",
                    style("Tips for Managing Diabetes:").yellow().bold()
                ));
                for tip in tips {
                    out.push_str(&format!("  - {}\n", tip));
                }
            }
            out
        }
        Err(e) => format!("{}\n", style(format!("Error in prediction: {}", e)).yellow()),
    }
}

pub fn render_fields() -> String {
    let mut out = format!(
        "{:<28} {:<28} {:>14} {:>8}\n",
        "FIELD", "LABEL", "RANGE", "DEFAULT"
    );
    for feature in Feature::ALL {
        let spec = feature.spec();
        let label = match spec.unit {
            Some(unit) => format!("{} ({})", spec.label, unit),
            None => spec.label.to_string(),
        };
        let range = format!("{}-{}", spec.min, spec.max);
        out.push_str(&format!(
            "{:<28} {:<28} {:>14} {:>8}\n",
            feature.name(),
            label,
            range,
            spec.default
        ));
    }
    out
}
