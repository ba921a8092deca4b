//! Whitespace cleanup for text pulled out of PDF pages.

use regex::Regex;
use std::sync::OnceLock;

const PARAGRAPH_MARK: &str = "\u{0}PARAGRAPH\u{0}";

static SPACE_RUNS: OnceLock<Regex> = OnceLock::new();

fn space_runs() -> &'static Regex {
    SPACE_RUNS.get_or_init(|| Regex::new(r" +").expect("space-run pattern should compile"))
}

/// Clean extracted text for narration.
///
/// This function:
/// - Joins words hyphenated across a line break ("exam-\nple" -> "example")
/// - Unwraps hard-wrapped lines (single newline -> space)
/// - Keeps paragraph breaks (double newline -> single newline)
/// - Collapses runs of spaces and trims the result
pub fn clean_text(text: &str) -> String {
    let text = text.replace("-\n", "");

    let text = text
        .replace("\n\n", PARAGRAPH_MARK)
        .replace('\n', " ")
        .replace(PARAGRAPH_MARK, "\n");

    space_runs().replace_all(&text, " ").trim().to_string()
}
