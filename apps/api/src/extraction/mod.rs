//! Text extraction — converts uploaded CV bytes (PDF, DOCX, plain text) into plain text.
//!
//! Extraction is "good enough" text for prompting, not layout reconstruction.
//! Parsing is CPU-bound and third-party parsers may panic on hostile input, so the
//! async entry point runs inside `tokio::task::spawn_blocking`.

pub mod docx;
pub mod pdf;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error reading PDF: {0}")]
    Pdf(String),

    #[error("Error reading DOCX: {0}")]
    Docx(String),

    #[error("Error reading text file: {0}")]
    Text(String),

    #[error("The document could not be parsed")]
    ParserCrashed,
}

/// Document format, decided from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// `.docx` and legacy `.doc` both go through the DOCX reader.
    Docx,
    PlainText,
    Unknown,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        match file_extension(filename).as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" | "doc" => DocumentKind::Docx,
            "txt" => DocumentKind::PlainText,
            _ => DocumentKind::Unknown,
        }
    }
}

/// Lower-cased text after the last dot. A name without a dot yields the whole name.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Extracted CV text, trimmed, with its length in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub char_count: usize,
}

impl ExtractedDocument {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let char_count = text.chars().count();
        Self { text, char_count }
    }
}

/// Synchronous dispatch by filename. Pure function of its inputs.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractionError> {
    match DocumentKind::from_filename(filename) {
        DocumentKind::Pdf => pdf::extract(bytes),
        DocumentKind::Docx => docx::extract(bytes),
        DocumentKind::PlainText => decode_utf8(bytes),
        DocumentKind::Unknown => pdf::extract(bytes).or_else(|pdf_err| {
            debug!("'{filename}' is not a readable PDF ({pdf_err}); trying DOCX");
            docx::extract(bytes)
        }),
    }
}

/// Runs [`extract_text`] on the blocking pool and wraps the result.
pub async fn extract_document(
    bytes: Bytes,
    filename: String,
) -> Result<ExtractedDocument, ExtractionError> {
    run_extractor(move || extract_text(&bytes, &filename)).await
}

/// A parser that panics on the worker surfaces as [`ExtractionError::ParserCrashed`].
async fn run_extractor<F>(extract: F) -> Result<ExtractedDocument, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    let raw = tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| {
            error!("Document parser worker failed: {e}");
            ExtractionError::ParserCrashed
        })??;
    Ok(ExtractedDocument::new(&raw))
}

fn decode_utf8(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractionError::Text(e.to_string()))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}
