//! Text processing for narration: cleaning, chapter isolation and chunking.

pub mod chapter;
pub mod chunker;
mod cleaner;

pub use chapter::{ChapterLocator, HeaderChapterLocator};
pub use chunker::chunk_text;
pub use cleaner::clean_text;
