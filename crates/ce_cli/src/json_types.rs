//! JSON envelopes printed by `ce eval --json`.

use ce_engine::{Diagnostic, Severity};
use serde::Serialize;
use serde_json::Value;

/// Result of one evaluation.
#[derive(Serialize, Debug)]
pub struct EvalJsonOutput {
    pub ok: bool,
    pub input: String,
    pub tier: String,

    /// MathJSON of the result
    pub result: Value,
    pub latex: String,

    /// No error node anywhere in the result
    pub valid: bool,
    pub diagnostics: Vec<DiagnosticJson>,
    pub options: OptionsJson,
}

#[derive(Serialize, Debug)]
pub struct DiagnosticJson {
    pub severity: &'static str,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl From<&Diagnostic> for DiagnosticJson {
    fn from(d: &Diagnostic) -> Self {
        Self {
            severity: match d.severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            },
            code: d.code.as_str(),
            message: d.message.clone(),
            subject: d.subject.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct OptionsJson {
    pub numeric_mode: String,
    pub precision: usize,
}

/// A failure that prevented any result.
#[derive(Serialize, Debug)]
pub struct ErrorJsonOutput {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl ErrorJsonOutput {
    pub fn new(error: impl Into<String>, input: Option<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            input,
        }
    }
}
