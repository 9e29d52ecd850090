use serde::{Deserialize, Serialize};

/// Which branch of the reconciled result the `analysis` string carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisFormat {
    /// `analysis` is canonical JSON text.
    Json,
    /// `analysis` is the model's raw output.
    Text,
}

/// Success body shared by all three analysis endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub filename: String,
    /// JSON text or raw model text; check `analysis_format` before parsing.
    pub analysis: String,
    pub analysis_format: AnalysisFormat,
    pub model: String,
    /// Characters in the trimmed CV text (before any prompt truncation).
    pub extracted_text_length: usize,
}
