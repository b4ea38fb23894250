//! Splitting oversized summarizer input into chunks.

use crate::core::string::{char_len, split_chars};

/// Pack sections greedily into chunks of at most `budget` characters.
///
/// Sections are kept whole when they fit; a single section longer than
/// the budget is split across several chunks. Order is preserved, so the
/// same input always yields the same chunks.
pub fn chunk_sections(sections: &[String], budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for section in sections {
        let len = char_len(section);
        if len > budget {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(split_chars(section, budget));
            continue;
        }
        if current_len + len > budget {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(section);
        current_len += len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
