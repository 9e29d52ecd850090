use tracing::debug;

use super::ExtractionError;

/// Extracts text page by page. Pages without extractable text (scans, images)
/// are skipped silently; only a document-level parse failure is an error.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let page_count = pages.len();
    let text_pages: Vec<&str> = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect();

    debug!(
        "PDF extraction: {} of {} pages had text",
        text_pages.len(),
        page_count
    );

    Ok(text_pages.join("\n"))
}
