//! Char-boundary-safe text helpers.
//!
//! All fitter sizes count `char`s, never bytes.

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `n`th char, or `text.len()` when `n` is past the end.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// The first `n` chars of `text`.
pub fn head_chars(text: &str, n: usize) -> &str {
    &text[..byte_offset(text, n)]
}

/// The last `n` chars of `text`.
pub fn tail_chars(text: &str, n: usize) -> &str {
    let len = char_len(text);
    if n >= len {
        return text;
    }
    &text[byte_offset(text, len - n)..]
}

/// Split `text` into pieces of at most `max_chars` chars each.
pub fn chunk_chars(text: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}
