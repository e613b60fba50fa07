//! Internal helpers for text normalization.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Collapses inner whitespace runs into single spaces.
pub(crate) fn normalize_display(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for names: decomposed, accents dropped, lowercased,
/// punctuation folded into single spaces.
pub(crate) fn search_key(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}
