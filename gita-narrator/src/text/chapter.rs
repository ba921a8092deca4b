//! Chapter boundary detection in cleaned text.

use std::ops::Range;

/// Characters skipped past a chapter's start before looking for the next header.
pub const END_SEARCH_OFFSET: usize = 100;

/// Strategy for finding where a chapter lives inside a document's text.
pub trait ChapterLocator: Send + Sync {
    /// Byte range of `chapter` within `text`.
    ///
    /// Returns `None` when the chapter's start cannot be found. A range
    /// ending at `text.len()` means no following chapter was found.
    fn locate(&self, text: &str, chapter: u32) -> Option<Range<usize>>;
}

/// Plain substring search for headers such as "Chapter 2" or "ADHYAY 2".
///
/// Each label is tried as written and upper-cased, in order; the first
/// pattern that occurs anywhere wins, even if a later pattern occurs earlier.
#[derive(Debug, Clone)]
pub struct HeaderChapterLocator {
    labels: Vec<String>,
}

impl Default for HeaderChapterLocator {
    fn default() -> Self {
        Self::new(["Chapter", "Adhyay"])
    }
}

impl HeaderChapterLocator {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Header patterns for a chapter number, in search priority order.
    pub fn patterns(&self, chapter: u32) -> Vec<String> {
        let mut patterns = Vec::with_capacity(self.labels.len() * 2);
        for label in &self.labels {
            for variant in [label.clone(), label.to_uppercase()] {
                let pattern = format!("{} {}", variant, chapter);
                if !patterns.contains(&pattern) {
                    patterns.push(pattern);
                }
            }
        }
        patterns
    }
}

impl ChapterLocator for HeaderChapterLocator {
    fn locate(&self, text: &str, chapter: u32) -> Option<Range<usize>> {
        let start = find_first(text, &self.patterns(chapter), 0)?;

        // TODO: confirm whether the 100-character skip is meant to guard
        // against a repeated header; short chapters can lose their end marker.
        let end = chapter
            .checked_add(1)
            .zip(text[start..].char_indices().nth(END_SEARCH_OFFSET))
            .and_then(|(next, (offset, _))| find_first(text, &self.patterns(next), start + offset))
            .unwrap_or(text.len());

        Some(start..end)
    }
}

/// Position of the first pattern (in list order) that occurs at or after `from`.
fn find_first(text: &str, patterns: &[String], from: usize) -> Option<usize> {
    let haystack = text.get(from..)?;
    patterns
        .iter()
        .find_map(|pattern| haystack.find(pattern.as_str()))
        .map(|idx| idx + from)
}
