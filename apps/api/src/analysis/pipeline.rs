//! Analysis pipeline — the orchestration shared by all three entry points.
//!
//! Flow: allow-list check → extract (blocking pool) → minimum-length check →
//!       build prompt → gateway (blocking pool) → reconcile → response.
//!
//! Input problems end the pipeline before the gateway is called, so unusable
//! uploads never cost an upstream request.

use anyhow::anyhow;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use tracing::info;

use crate::analysis::prompts::build_prompt;
use crate::analysis::reconcile::reconcile;
use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::{extract_document, file_extension, ExtractedDocument};
use crate::llm_client::generate_off_thread;
use crate::models::analysis::AnalysisResponse;
use crate::state::AppState;

/// Trimmed CV text shorter than this is rejected.
pub const MIN_CV_CHARS: usize = 50;

pub const NO_FILE: &str = "No file provided";
pub const UNSUPPORTED_FORMAT: &str =
    "Unsupported file format. Please upload PDF, DOCX, DOC, or TXT";
const INSUFFICIENT_EXTRACTED: &str = "Could not extract enough text from the CV. \
    Please ensure the file contains readable text.";
const INSUFFICIENT_PASTED: &str = "Please provide at least 50 characters of CV text";

/// Where the CV text came from; only changes the wording of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Document,
    PastedText,
}

impl InputSource {
    fn insufficient_message(self) -> &'static str {
        match self {
            InputSource::Document => INSUFFICIENT_EXTRACTED,
            InputSource::PastedText => INSUFFICIENT_PASTED,
        }
    }
}

/// Rejects missing filenames and extensions outside the configured allow-list.
pub fn ensure_supported(filename: &str, config: &Config) -> Result<(), AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::Validation(NO_FILE.to_string()));
    }
    if !config.is_extension_allowed(&file_extension(filename)) {
        return Err(AppError::Validation(UNSUPPORTED_FORMAT.to_string()));
    }
    Ok(())
}

/// Decodes a base64 upload. Accepts an optional `data:<mime>;base64,` prefix and
/// ignores embedded whitespace (line-wrapped encoders).
pub fn decode_base64_payload(data: &str) -> Result<Vec<u8>, AppError> {
    let data = data.trim();
    let payload = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(AppError::Validation(NO_FILE.to_string()));
    }

    STANDARD
        .decode(cleaned)
        .map_err(|e| AppError::Validation(format!("Invalid base64 data: {e}")))
}

/// Full pipeline for an uploaded document (multipart or base64).
pub async fn analyze_document(
    state: &AppState,
    filename: String,
    bytes: Bytes,
    interests: Option<&str>,
) -> Result<AnalysisResponse, AppError> {
    ensure_supported(&filename, &state.config)?;

    let document = extract_document(bytes, filename.clone()).await?;
    info!(
        "Extracted {} characters from '{}'",
        document.char_count, filename
    );

    analyze_extracted(state, filename, document, interests, InputSource::Document).await
}

/// Pipeline for pasted CV text; no extension check applies.
pub async fn analyze_pasted_text(
    state: &AppState,
    filename: String,
    cv_text: &str,
    interests: Option<&str>,
) -> Result<AnalysisResponse, AppError> {
    let document = ExtractedDocument::new(cv_text);
    analyze_extracted(state, filename, document, interests, InputSource::PastedText).await
}

async fn analyze_extracted(
    state: &AppState,
    filename: String,
    document: ExtractedDocument,
    interests: Option<&str>,
    source: InputSource,
) -> Result<AnalysisResponse, AppError> {
    if document.char_count < MIN_CV_CHARS {
        return Err(AppError::Validation(
            source.insufficient_message().to_string(),
        ));
    }

    let prompt = build_prompt(&document.text, interests, state.config.max_cv_chars);

    let raw = generate_off_thread(state.gateway.clone(), prompt)
        .await
        .map_err(|e| AppError::Internal(anyhow!("gateway worker failed: {e}")))??;

    let output = reconcile(raw);
    let analysis_format = output.format();
    info!(
        "Analysis complete for '{}': format={:?}, text_length={}",
        filename, analysis_format, document.char_count
    );

    Ok(AnalysisResponse {
        success: true,
        filename,
        analysis: output.into_analysis_string(),
        analysis_format,
        model: state.gateway.model().to_string(),
        extracted_text_length: document.char_count,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::test_config;
    use crate::extraction::fixtures;
    use crate::llm_client::stub::StubGateway;
    use crate::models::analysis::AnalysisFormat;

    const VALID_JSON: &str = r#"{"skills_summary": [], "experience_level": "Junior",
        "career_recommendations": [], "cv_improvement_feedback": {},
        "skills_gap_analysis": [], "action_plan": []}"#;

    fn state_with(gateway: Arc<StubGateway>) -> AppState {
        AppState {
            gateway,
            config: test_config(),
        }
    }

    fn cv_text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_ensure_supported_is_case_insensitive() {
        let config = test_config();
        assert!(ensure_supported("CV.PDF", &config).is_ok());
        assert!(ensure_supported("cv.Docx", &config).is_ok());
        assert!(ensure_supported("cv.doc", &config).is_ok());
        assert!(ensure_supported("cv.txt", &config).is_ok());
    }

    #[test]
    fn test_ensure_supported_rejects_other_extensions() {
        let config = test_config();
        for name in ["photo.png", "cv", "archive.pdf.zip"] {
            match ensure_supported(name, &config) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, UNSUPPORTED_FORMAT),
                other => panic!("{name}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_ensure_supported_rejects_blank_filename() {
        match ensure_supported("  ", &test_config()) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, NO_FILE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_base64_payload("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_data_url_and_wrapped_lines() {
        let decoded = decode_base64_payload("data:text/plain;base64,aGVs\r\nbG8=\n").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        match decode_base64_payload("%%%not-base64%%%") {
            Err(AppError::Validation(msg)) => assert!(msg.starts_with("Invalid base64 data")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(
            decode_base64_payload("   "),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_49_chars_rejected_without_gateway_call() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());
        let text = format!("   {}\n\n", cv_text(49));

        let err = analyze_pasted_text(&state, "manual_input.txt".into(), &text, None)
            .await
            .unwrap_err();

        match err {
            AppError::Validation(msg) => assert_eq!(msg, INSUFFICIENT_PASTED),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_50_chars_reaches_gateway() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());

        let response = analyze_pasted_text(&state, "manual_input.txt".into(), &cv_text(50), None)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.extracted_text_length, 50);
        assert_eq!(response.analysis_format, AnalysisFormat::Json);
        assert_eq!(response.model, "stub-model");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_upload_never_calls_gateway() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());

        let err = analyze_document(
            &state,
            "portrait.png".into(),
            Bytes::from(cv_text(200)),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == UNSUPPORTED_FORMAT));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_extraction_error() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());

        let err = analyze_document(
            &state,
            "cv.docx".into(),
            Bytes::from_static(b"this is not a zip archive"),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_docx_with_too_little_text_is_rejected() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());
        let bytes = Bytes::from(fixtures::docx(&["Jane Doe", "", "Cook"]));

        let err = analyze_document(&state, "cv.docx".into(), bytes, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == INSUFFICIENT_EXTRACTED));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_docx_length_is_trimmed_extracted_length() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());
        let paragraphs = [
            "Jane Doe",
            "Senior Data Engineer with eight years of pipeline work",
            "",
            "Skills: Python, Spark, Airflow",
        ];
        let expected = paragraphs
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
            .chars()
            .count();

        let response = analyze_document(
            &state,
            "cv.docx".into(),
            Bytes::from(fixtures::docx(&paragraphs)),
            Some("data platforms"),
        )
        .await
        .unwrap();

        assert_eq!(response.extracted_text_length, expected);
        assert_eq!(response.filename, "cv.docx");
        let prompt = gateway.last_prompt().unwrap();
        assert!(prompt.contains("Skills: Python, Spark, Airflow"));
        assert!(prompt.contains("User interests: data platforms"));
    }

    #[tokio::test]
    async fn test_prose_output_is_raw_success() {
        let prose = "Here is my analysis:\n- You know Rust.\n- Learn Kubernetes.";
        let gateway = Arc::new(StubGateway::text(prose));
        let state = state_with(gateway);

        let response = analyze_pasted_text(&state, "cv.txt".into(), &cv_text(80), None)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.analysis, prose);
        assert_eq!(response.analysis_format, AnalysisFormat::Text);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_upstream_error() {
        let gateway = Arc::new(StubGateway::failing("model overloaded"));
        let state = state_with(gateway.clone());

        let err = analyze_pasted_text(&state, "cv.txt".into(), &cv_text(80), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_gateway_output_is_upstream_error() {
        let gateway = Arc::new(StubGateway::text(""));
        let state = state_with(gateway);

        let err = analyze_pasted_text(&state, "cv.txt".into(), &cv_text(80), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_long_text_is_truncated_in_prompt_but_not_in_length() {
        let gateway = Arc::new(StubGateway::text(VALID_JSON));
        let state = state_with(gateway.clone());
        let text = cv_text(40_500);

        let response = analyze_pasted_text(&state, "cv.txt".into(), &text, None)
            .await
            .unwrap();

        assert_eq!(response.extracted_text_length, 40_500);
        let prompt = gateway.last_prompt().unwrap();
        assert_eq!(prompt.matches("[TRUNCATED]").count(), 1);
        assert!(!prompt.contains(&cv_text(40_001)));
    }
}
