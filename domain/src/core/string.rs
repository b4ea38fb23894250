//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters, appending an
/// ellipsis when anything was cut. Counts characters, not bytes, so the
/// cut always lands on a UTF-8 boundary.
///
/// Limits below the ellipsis width cut without it, so the result never
/// exceeds `max_chars`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    const ELLIPSIS: &str = "...";

    if s.char_indices().nth(max_chars).is_none() {
        return s.to_string();
    }
    let (keep, suffix) = if max_chars < ELLIPSIS.len() {
        (max_chars, "")
    } else {
        (max_chars - ELLIPSIS.len(), ELLIPSIS)
    };
    let end = s.char_indices().nth(keep).map(|(i, _)| i).unwrap_or(s.len());
    format!("{}{}", &s[..end], suffix)
}

/// Character length of a string
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split a string into pieces of at most `max_chars` characters each.
///
/// Returns at least one piece; an empty input yields a single empty piece.
pub fn split_chars(s: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for c in s.chars() {
        if count == max_chars {
            pieces.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    pieces.push(current);
    pieces
}
