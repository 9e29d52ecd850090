//! Axum route handlers for the CV analysis API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, JsonRejection},
        Multipart, State,
    },
    http::StatusCode,
    Form, Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::analysis::pipeline::{
    analyze_document, analyze_pasted_text, decode_base64_payload, NO_FILE,
};
use crate::errors::AppError;
use crate::models::analysis::AnalysisResponse;
use crate::state::AppState;

const DEFAULT_TEXT_FILENAME: &str = "manual_input.txt";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

// Missing fields deserialize as empty so the pipeline's presence checks answer them.

#[derive(Debug, Deserialize)]
pub struct Base64AnalysisRequest {
    #[serde(default)]
    pub file_data: String,
    #[serde(default)]
    pub filename: String,
    pub interests: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    #[serde(default)]
    pub cv_text: String,
    pub filename: Option<String>,
    pub interests: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze-cv
///
/// Multipart upload: a `file` part plus an optional `interests` text part.
pub async fn handle_analyze_cv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut multipart =
        multipart.map_err(|e| rejected("multipart", e.status(), e.body_text()))?;
    let mut upload: Option<(String, Bytes)> = None;
    let mut interests: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some((filename, bytes));
            }
            "interests" => {
                interests = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| AppError::Validation(NO_FILE.to_string()))?;

    let response = analyze_document(&state, filename, bytes, interests.as_deref()).await?;
    Ok(Json(response))
}

/// POST /analyze-cv-base64
///
/// Form fields `file_data` (base64), `filename`, optional `interests`.
pub async fn handle_analyze_cv_base64(
    State(state): State<AppState>,
    request: Result<Form<Base64AnalysisRequest>, FormRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Form(request) = request.map_err(|e| rejected("form", e.status(), e.body_text()))?;
    let bytes = decode_base64_payload(&request.file_data)?;

    let response = analyze_document(
        &state,
        request.filename,
        Bytes::from(bytes),
        request.interests.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// POST /analyze-cv-text
///
/// JSON body with pasted CV text. No file-type checks apply.
pub async fn handle_analyze_cv_text(
    State(state): State<AppState>,
    request: Result<Json<TextAnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = request.map_err(|e| rejected("JSON", e.status(), e.body_text()))?;
    let filename = request
        .filename
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEXT_FILENAME.to_string());

    let response = analyze_pasted_text(
        &state,
        filename,
        &request.cv_text,
        request.interests.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

fn multipart_error(e: MultipartError) -> AppError {
    rejected("multipart", e.status(), e.body_text())
}

/// Extractor rejections keep the structured error body. An oversized body stays a 413;
/// everything else is a client input error.
fn rejected(body_kind: &str, status: StatusCode, detail: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(detail)
    } else {
        AppError::Validation(format!("Invalid {body_kind} body: {detail}"))
    }
}
