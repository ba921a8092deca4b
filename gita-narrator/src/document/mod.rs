//! Document text extraction, optionally scoped to one chapter.

mod pdf;

pub use pdf::PdfReader;

use crate::error::{PipelineError, Result};
use crate::text::{clean_text, ChapterLocator};
use std::path::Path;

/// Source of raw page text.
pub trait DocumentReader: Send + Sync {
    /// Raw text of every page, in page order.
    fn read_pages(&self, path: &Path) -> anyhow::Result<Vec<String>>;
}

/// Turns a document into cleaned narration text.
pub struct TextExtractor {
    reader: Box<dyn DocumentReader>,
    locator: Box<dyn ChapterLocator>,
}

impl TextExtractor {
    pub fn new(reader: Box<dyn DocumentReader>, locator: Box<dyn ChapterLocator>) -> Self {
        Self { reader, locator }
    }

    /// Extract cleaned text, isolating `chapter` when requested.
    ///
    /// A chapter whose header cannot be found yields the whole text.
    pub fn extract(&self, path: &Path, chapter: Option<u32>) -> Result<String> {
        let pages = self
            .reader
            .read_pages(path)
            .map_err(|e| PipelineError::ExtractionFailed(format!("{:#}", e)))?;

        log::info!("Opened document with {} pages", pages.len());

        let cleaned = clean_text(&join_pages(&pages));
        if cleaned.is_empty() {
            return Err(PipelineError::ExtractionFailed(format!(
                "no extractable text in {}",
                path.display()
            )));
        }

        let Some(chapter) = chapter else {
            return Ok(cleaned);
        };

        log::info!("Attempting to extract Chapter {}...", chapter);
        match self.locator.locate(&cleaned, chapter) {
            Some(range) => {
                if range.end < cleaned.len() {
                    log::info!("Extracted Chapter {} successfully", chapter);
                }
                Ok(cleaned[range].trim().to_string())
            }
            None => {
                log::warn!(
                    "Could not find start of Chapter {}. Returning full text.",
                    chapter
                );
                Ok(cleaned)
            }
        }
    }
}

/// Join page texts with newlines, skipping pages that produced no text.
///
/// A page holding only whitespace is kept, so a lone "\n" page still
/// separates its neighbours as a paragraph break.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
