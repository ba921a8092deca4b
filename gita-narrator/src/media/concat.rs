//! Concat-demuxer list files.

use anyhow::{Context, Result};
use std::path::Path;

/// Render one `file '<path>'` line per input, escaping single quotes.
pub fn render_list<P: AsRef<Path>>(files: &[P]) -> String {
    let mut content = String::new();
    for path in files {
        let path_str = path.as_ref().to_string_lossy().replace('\'', "'\\''");
        content.push_str(&format!("file '{}'\n", path_str));
    }
    content
}

/// Write a concat list to `list_path`.
pub fn write_list<P: AsRef<Path>>(files: &[P], list_path: &Path) -> Result<()> {
    std::fs::write(list_path, render_list(files))
        .with_context(|| format!("Failed to write concat list {}", list_path.display()))
}

/// Inverse of [`render_list`]; used by tests to follow a list back to its files.
#[cfg(test)]
pub fn parse_list(content: &str) -> Vec<std::path::PathBuf> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix("file '")?.strip_suffix('\''))
        .map(|path| std::path::PathBuf::from(path.replace("'\\''", "'")))
        .collect()
}
