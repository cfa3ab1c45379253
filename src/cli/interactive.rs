use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use super::render_outcome;
use crate::ml::{Feature, FieldSpec, Predictor, RawValue};

const TITLE: &str = "DiaGuard: AI-Powered Diabetes Prediction";
const DESCRIPTION: &str = "This tool uses Machine Learning to analyze health data and assess \
the likelihood of diabetes. Enter your details below to get a quick prediction.";
const FOOTER: &str = "Empowering health through technology. Stay informed, stay healthy!";

/// Interactive health form. Each submission is classified before the next one starts.
pub struct PredictionForm<'a> {
    predictor: Predictor<'a>,
    theme: ColorfulTheme,
}

impl<'a> PredictionForm<'a> {
    pub fn new(predictor: Predictor<'a>) -> Self {
        Self {
            predictor,
            theme: ColorfulTheme::default(),
        }
    }

    /// Launch the form and keep accepting submissions until the user stops.
    pub fn run(&self) -> Result<()> {
        println!("{}", style(TITLE).cyan().bold());
        println!("{}\n", DESCRIPTION);

        loop {
            println!("{}", style("Fill in the details below:").bold());
            let raw = self.collect()?;

            let outcome = self.predictor.classify(&raw);
            println!();
            print!("{}", render_outcome(&outcome));
            println!();

            let again = Confirm::with_theme(&self.theme)
                .with_prompt("Run another prediction?")
                .default(true)
                .interact()?;

            if !again {
                break;
            }
        }

        println!("{}", style(FOOTER).dim());
        Ok(())
    }

    fn collect(&self) -> Result<Vec<RawValue>> {
        Feature::ALL
            .iter()
            .map(|feature| self.prompt_field(*feature))
            .collect()
    }

    fn prompt_field(&self, feature: Feature) -> Result<RawValue> {
        let spec = feature.spec();
        let integral = feature.is_integral();

        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt_label(&spec))
            .default(format_default(&spec, integral))
            .validate_with(move |input: &String| validate_entry(input, &spec, integral))
            .interact_text()?;

        Ok(RawValue::Text(value))
    }
}

fn prompt_label(spec: &FieldSpec) -> String {
    match spec.unit {
        Some(unit) => format!("{} ({}) [{}-{}]", spec.label, unit, spec.min, spec.max),
        None => format!("{} [{}-{}]", spec.label, spec.min, spec.max),
    }
}

fn format_default(spec: &FieldSpec, integral: bool) -> String {
    if integral {
        format!("{}", spec.default as i64)
    } else {
        spec.default.to_string()
    }
}

/// Range and whole-number checks belong to the form, not the predictor.
fn validate_entry(input: &str, spec: &FieldSpec, integral: bool) -> Result<(), String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid numerical value".to_string())?;

    if !(spec.min..=spec.max).contains(&value) {
        return Err(format!("Value must be between {} and {}", spec.min, spec.max));
    }
    if integral && value.fract() != 0.0 {
        return Err("Value must be a whole number".to_string());
    }
    Ok(())
}
