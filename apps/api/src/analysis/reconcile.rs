//! Result reconciliation — decides whether model output is structured JSON or raw text.
//!
//! Raw text is a degraded success, never an error: the model's output format
//! cannot be guaranteed, and callers must handle both branches.

use serde_json::Value;
use tracing::warn;

use crate::llm_client::prompts::ANALYSIS_KEYS;
use crate::models::analysis::AnalysisFormat;

const PREVIEW_CHARS: usize = 500;

/// Model output after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutput {
    Structured(Value),
    Raw(String),
}

impl AnalysisOutput {
    pub fn format(&self) -> AnalysisFormat {
        match self {
            AnalysisOutput::Structured(_) => AnalysisFormat::Json,
            AnalysisOutput::Raw(_) => AnalysisFormat::Text,
        }
    }

    /// Wire form: canonical compact JSON (non-ASCII kept as-is) or the raw text untouched.
    pub fn into_analysis_string(self) -> String {
        match self {
            AnalysisOutput::Structured(value) => value.to_string(),
            AnalysisOutput::Raw(text) => text,
        }
    }
}

pub fn reconcile(raw: String) -> AnalysisOutput {
    match parse_json(&raw) {
        Some(value) => {
            let missing = missing_keys(&value);
            if !missing.is_empty() {
                warn!("Model JSON is missing expected keys: {}", missing.join(", "));
            }
            AnalysisOutput::Structured(value)
        }
        None => {
            let preview: String = raw.chars().take(PREVIEW_CHARS).collect();
            warn!("Model returned non-JSON output; returning raw text for client: {preview}");
            AnalysisOutput::Raw(raw)
        }
    }
}

fn parse_json(raw: &str) -> Option<Value> {
    serde_json::from_str(raw)
        .ok()
        .or_else(|| serde_json::from_str(strip_json_fences(raw)).ok())
}

fn missing_keys(value: &Value) -> Vec<&'static str> {
    ANALYSIS_KEYS
        .iter()
        .copied()
        .filter(|key| value.get(key).is_none())
        .collect()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let body = body.trim_start();
    body.strip_suffix("```").map(str::trim).unwrap_or(body)
}
