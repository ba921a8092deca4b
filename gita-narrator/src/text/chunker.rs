//! Fixed-budget text chunking for TTS requests.

/// Split text into contiguous chunks of at most `max_chars` characters.
///
/// Chunks are cut on character boundaries only, never inside a UTF-8
/// sequence, so concatenating the result reproduces `text` exactly. Only
/// the last chunk may be shorter than `max_chars`.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::with_capacity(text.len() / max_chars + 1);
    let mut rest = text;

    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(cut);
        chunks.push(chunk);
        rest = tail;
    }

    chunks
}
