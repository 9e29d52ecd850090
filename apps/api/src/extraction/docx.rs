use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::debug;

use super::ExtractionError;

/// Parses the OOXML package with `docx-rs` and joins the non-empty paragraphs
/// with newlines. Paragraphs inside table cells count as paragraphs.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::Docx(format!("{e:?}")))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => push_paragraph(&mut paragraphs, para),
            DocumentChild::Table(table) => collect_table(&mut paragraphs, table),
            _ => {}
        }
    }

    debug!("DOCX yielded {} non-empty paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn collect_table(out: &mut Vec<String>, table: &Table) {
    let cells = table
        .rows
        .iter()
        .flat_map(|TableChild::TableRow(row)| row.cells.iter())
        .map(|TableRowChild::TableCell(cell)| cell);
    for cell in cells {
        for content in &cell.children {
            match content {
                TableCellContent::Paragraph(para) => push_paragraph(out, para),
                TableCellContent::Table(nested) => collect_table(out, nested),
                _ => {}
            }
        }
    }
}

fn push_paragraph(out: &mut Vec<String>, para: &Paragraph) {
    let text = paragraph_text(para);
    if !text.trim().is_empty() {
        out.push(text);
    }
}

/// Runs within one paragraph are concatenated without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}
