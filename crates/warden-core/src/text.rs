//! Char-boundary-safe text helpers.

/// First `max_chars` characters of `s`, with `...` appended when cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
