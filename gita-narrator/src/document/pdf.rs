//! PDF page text via lopdf.
//!
//! lopdf's `extract_text` runs every string shown inside one text object
//! together, so hard-wrapped lines come back glued ("Panduassembled"). Each
//! page's content stream is therefore split at line-moving operators and
//! extracted one line at a time, then rejoined with newlines.

use super::DocumentReader;
use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, ObjectId};
use std::path::Path;

/// Operators that start a new line of text.
const LINE_BREAK_OPERATORS: &[&str] = &["T*", "Td", "TD", "'", "\"", "ET"];

/// Reads the text layer of a PDF, page by page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        let mut doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF {}", path.display()))?;

        let mut pages = Vec::new();
        for (page_number, page_id) in doc.get_pages() {
            // A page without a usable text layer contributes nothing.
            match read_page(&mut doc, page_number, page_id) {
                Ok(text) => pages.push(text),
                Err(e) => log::debug!("No text on page {}: {:#}", page_number, e),
            }
        }

        Ok(pages)
    }
}

/// Text of one page with a newline between visual lines.
///
/// Only the in-memory document is rewritten; the file is never saved.
fn read_page(doc: &mut Document, page_number: u32, page_id: ObjectId) -> Result<String> {
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut lines = Vec::new();
    for operations in split_lines(&content.operations) {
        doc.change_page_content(page_id, Content { operations }.encode()?)?;
        let line = doc.extract_text(&[page_number])?;
        let line = line.trim_end_matches('\n');
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    Ok(lines.join("\n"))
}

/// Group the text-showing operations of a content stream into lines.
///
/// Each line carries the font selection in effect when it starts, so it
/// decodes on its own. `'` and `"` both move to the next line and then show
/// a string; they are rewritten as a line break followed by `Tj`.
fn split_lines(operations: &[Operation]) -> Vec<Vec<Operation>> {
    let mut lines = Vec::new();
    let mut font: Option<Operation> = None;
    let mut current: Vec<Operation> = Vec::new();
    let mut shown = false;

    for op in operations {
        let operator = op.operator.as_str();

        if LINE_BREAK_OPERATORS.contains(&operator) && shown {
            lines.push(std::mem::take(&mut current));
            current.extend(font.clone());
            shown = false;
        }

        match operator {
            "Tf" => {
                font = Some(op.clone());
                current.push(op.clone());
            }
            "Tj" | "TJ" => {
                current.push(op.clone());
                shown = true;
            }
            "'" | "\"" => {
                if let Some(text) = op.operands.last() {
                    current.push(Operation::new("Tj", vec![text.clone()]));
                    shown = true;
                }
            }
            _ => {}
        }
    }

    if shown {
        lines.push(current);
    }
    lines
}
