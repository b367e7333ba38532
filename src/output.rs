use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;
use crate::recover::Recovery;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Text,
}

/// A recovery in the shape it is printed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Polynomial {
        degree: usize,
        coefficients_high_to_low: Vec<String>,
    },
    Secret {
        secret: String,
    },
}

impl From<&Recovery> for Report {
    fn from(recovery: &Recovery) -> Self {
        match recovery {
            Recovery::Polynomial(poly) => Report::Polynomial {
                degree: poly.degree(),
                coefficients_high_to_low: poly.coefficients_high_to_low(),
            },
            Recovery::Secret(secret) => Report::Secret {
                secret: secret.to_string(),
            },
        }
    }
}

impl Report {
    fn text(&self) -> String {
        match self {
            Report::Polynomial {
                degree,
                coefficients_high_to_low,
            } => format!(
                "degree: {}\ncoefficients_high_to_low: {}",
                degree,
                coefficients_high_to_low.join(" ")
            ),
            Report::Secret { secret } => format!("secret: {}", secret),
        }
    }
}

/// One labelled entry of a batch run: either a report or the error message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub input: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Ok(Report),
    Err { error: String },
}

impl BatchEntry {
    pub fn new(input: impl Into<String>, result: &Result<Recovery>) -> Self {
        let outcome = match result {
            Ok(recovery) => Outcome::Ok(recovery.into()),
            Err(e) => Outcome::Err {
                error: e.to_string(),
            },
        };
        BatchEntry {
            input: input.into(),
            outcome,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok(_))
    }
}

pub fn render(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(report)?),
        Format::Text => Ok(report.text()),
    }
}

pub fn render_batch(entries: &[BatchEntry], format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(entries)?),
        Format::Text => {
            let mut out = String::new();
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let body = match &entry.outcome {
                    Outcome::Ok(report) => report.text(),
                    Outcome::Err { error } => format!("error: {}", error),
                };
                // writing to a String cannot fail
                let _ = writeln!(out, "[{}]\n{}", entry.input, body);
            }
            Ok(out.trim_end().to_string())
        }
    }
}
