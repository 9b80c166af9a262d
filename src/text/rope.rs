//! Rope wrapper using the ropey crate.
//!
//! Ropey addresses text by `char`; the rest of the crate addresses it by
//! grapheme cluster. This wrapper owns the translation between the two for
//! a single line at a time.

use super::position::Position;
use crate::unicode::{grapheme_byte_offset, grapheme_count, graphemes, split_terminator};
use ropey::{Rope, RopeSlice};
use std::borrow::Cow;

/// Wrapper around ropey::Rope with grapheme-aware line helpers.
#[derive(Clone, Debug, Default)]
pub struct RopeWrapper {
    rope: Rope,
}

impl RopeWrapper {
    /// Create an empty rope.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a rope from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines; an empty rope has one.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Get a line by index, terminator included.
    #[must_use]
    pub fn line(&self, idx: usize) -> Option<RopeSlice<'_>> {
        self.rope.get_line(idx)
    }

    /// Line text, borrowed when the rope chunk is contiguous.
    #[must_use]
    pub fn line_text(&self, idx: usize) -> Option<Cow<'_, str>> {
        self.line(idx).map(slice_text)
    }

    /// Char index of grapheme `character` on `line` (document-wide).
    ///
    /// Only positions inside the line content are accepted; the boundary
    /// after the terminator belongs to the next line.
    #[must_use]
    pub fn grapheme_to_char(&self, line: usize, character: usize) -> Option<usize> {
        let text = self.line_text(line)?;
        let (content, _) = split_terminator(&text);
        let byte = grapheme_byte_offset(content, character)?;
        Some(self.rope.line_to_char(line) + content[..byte].chars().count())
    }

    /// Grapheme boundary nearest to char `char_idx`, with its position.
    ///
    /// An index inside a cluster snaps to the cluster start, or to its end
    /// when `round_up` is set. The end of a terminator is the start of the
    /// next line.
    #[must_use]
    pub fn snap_to_grapheme(&self, char_idx: usize, round_up: bool) -> (usize, Position) {
        let char_idx = char_idx.min(self.len_chars());
        let line = self.rope.char_to_line(char_idx);
        let text = self.line_text(line).unwrap_or_default();
        let content_len = grapheme_count(split_terminator(&text).0);

        let mut start = self.rope.line_to_char(line);
        for (character, grapheme) in graphemes(&text).enumerate() {
            let end = start + grapheme.chars().count();
            if char_idx == start || (char_idx < end && !round_up) {
                return (start, Position::new(line, character));
            }
            if char_idx < end {
                let after = if character >= content_len {
                    Position::new(line + 1, 0)
                } else {
                    Position::new(line, character + 1)
                };
                return (end, after);
            }
            start = end;
        }
        (start, Position::new(line, content_len))
    }

    /// Owned text between two char indices.
    #[must_use]
    pub fn slice_to_string(&self, chars: std::ops::Range<usize>) -> String {
        self.rope
            .get_slice(chars)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Insert text at a character position.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        if char_idx <= self.len_chars() {
            self.rope.insert(char_idx, text);
        }
    }

    /// Remove a range of characters.
    pub fn remove(&mut self, chars: std::ops::Range<usize>) {
        self.rope.remove(chars);
    }

    /// Convert to string.
    #[must_use]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    /// Get the char index at the start of a line.
    #[must_use]
    pub fn line_to_char(&self, line_idx: usize) -> usize {
        if line_idx >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line_idx)
        }
    }
}

fn slice_text(slice: RopeSlice<'_>) -> Cow<'_, str> {
    slice.as_str().map_or_else(|| Cow::Owned(slice.to_string()), Cow::Borrowed)
}

impl From<&str> for RopeWrapper {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}
