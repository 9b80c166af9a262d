//! Grapheme cluster iteration and line terminator handling.
//!
//! Buffer positions count extended grapheme clusters. A line terminator is
//! always exactly one cluster (`"\r\n"` included), and UAX #29 never joins a
//! terminator with its neighbours, so clusters never straddle a line
//! boundary.

use unicode_segmentation::UnicodeSegmentation;

/// Iterate over grapheme clusters in a string.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Iterate over grapheme clusters with byte indices.
pub fn grapheme_indices(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.grapheme_indices(true)
}

/// Number of grapheme clusters in `s`.
#[must_use]
pub fn grapheme_count(s: &str) -> usize {
    if s.is_ascii() && !s.contains('\r') {
        return s.len();
    }
    s.graphemes(true).count()
}

/// Byte offset of the `n`th grapheme boundary in `s`.
///
/// `n == grapheme_count(s)` yields `s.len()`; anything past that is `None`.
#[must_use]
pub fn grapheme_byte_offset(s: &str, n: usize) -> Option<usize> {
    if s.is_ascii() && !s.contains('\r') {
        return (n <= s.len()).then_some(n);
    }
    let mut count = 0;
    for (idx, _) in s.grapheme_indices(true) {
        if count == n {
            return Some(idx);
        }
        count += 1;
    }
    (count == n).then_some(s.len())
}

/// Whether a grapheme cluster is a line terminator.
///
/// Matches the line breaks the rope recognises: LF, CRLF, CR, VT, FF, NEL,
/// LINE SEPARATOR and PARAGRAPH SEPARATOR.
#[must_use]
pub fn is_line_terminator(grapheme: &str) -> bool {
    matches!(
        grapheme,
        "\n" | "\r\n" | "\r" | "\u{0B}" | "\u{0C}" | "\u{85}" | "\u{2028}" | "\u{2029}"
    )
}

/// Split a rope line into its content and trailing terminator (possibly empty).
#[must_use]
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        return (content, "\r\n");
    }
    match line.char_indices().next_back() {
        Some((idx, ch)) if is_line_terminator(&line[idx..]) => {
            debug_assert_eq!(idx + ch.len_utf8(), line.len());
            line.split_at(idx)
        }
        _ => (line, ""),
    }
}

/// Count the terminators contained in `s`.
#[must_use]
pub fn line_terminator_count(s: &str) -> usize {
    s.graphemes(true).filter(|g| is_line_terminator(g)).count()
}

/// Whether every scalar in the cluster is whitespace.
#[must_use]
pub fn is_whitespace(grapheme: &str) -> bool {
    !grapheme.is_empty() && grapheme.chars().all(char::is_whitespace)
}
