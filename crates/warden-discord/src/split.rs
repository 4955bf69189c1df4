//! Outbound message chunking.

/// Split `message` into chunks of at most `max_chars` characters.
///
/// Counts characters, not bytes, so multi-byte text never splits inside a
/// code point. Prefers breaking after the last newline in a chunk when one
/// exists.
pub fn split_message(message: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 || message.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut rest = message;
    while !rest.is_empty() {
        let Some((hard_end, _)) = rest.char_indices().nth(max_chars) else {
            chunks.push(rest);
            break;
        };
        let end = match rest[..hard_end].rfind('\n') {
            Some(nl) if nl > 0 => nl + 1,
            _ => hard_end,
        };
        chunks.push(&rest[..end]);
        rest = &rest[end..];
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_single_chunk() {
        assert_eq!(split_message("hello", 2000), vec!["hello"]);
    }

    #[test]
    fn empty_or_zero_limit() {
        assert!(split_message("", 10).is_empty());
        assert!(split_message("abc", 0).is_empty());
    }

    #[test]
    fn hard_split_without_newlines() {
        assert_eq!(split_message("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn prefers_newline_boundary() {
        assert_eq!(split_message("ab\ncdef", 5), vec!["ab\n", "cdef"]);
    }

    #[test]
    fn exact_fit_not_split() {
        assert_eq!(split_message("abc", 3), vec!["abc"]);
    }

    #[test]
    fn multibyte_safe() {
        let text = "é".repeat(5);
        let chunks = split_message(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn long_decision_respects_discord_limit() {
        let text = format!("**Decision**: kick\nReason: {}", "x".repeat(4500));
        let chunks = split_message(&text, 2000);
        assert!(chunks.iter().all(|c| c.chars().count() <= 2000));
        assert_eq!(chunks.concat(), text);
    }
}
