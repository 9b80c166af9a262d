//! Rope-backed text buffer addressed by line/grapheme positions.
//!
//! [`TextBuffer`] owns the raw content and its [`LineIndex`]. It knows
//! nothing about styles or layout: [`TextStorage`](super::TextStorage) wraps
//! it to rebase attributes and announce changes.

use super::line_index::LineIndex;
use super::position::{Position, Range};
use super::rope::RopeWrapper;
use crate::error::{Error, Result};
use crate::unicode::{graphemes, split_terminator};
use std::borrow::Cow;

/// Panic with the error's message; used where a bad argument is a caller bug.
pub(crate) fn precondition<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("precondition violated: {err}"),
    }
}

/// Outcome of [`TextBuffer::try_replace`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Splice {
    /// Whole clusters now holding the new text.
    pub range: Range,
    /// Text taken out of the replaced range.
    pub removed: String,
    /// What `range` held before the edit: `removed` plus any neighbouring
    /// text that regrouped with the new text.
    pub replaced: String,
    /// Whether neighbouring clusters regrouped across the edit.
    pub merged: bool,
}

/// Mutable document content with a grapheme line index.
///
/// Line numbers are dense `0..lines_count()`. Every line except the last
/// ends with exactly one terminator cluster. An empty buffer has one empty
/// line.
#[derive(Clone, Debug, Default)]
pub struct TextBuffer {
    rope: RopeWrapper,
    index: LineIndex,
    revision: u64,
}

impl TextBuffer {
    /// Create an empty text buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let rope = RopeWrapper::from_str(text);
        let index = LineIndex::build(&rope);
        Self {
            rope,
            index,
            revision: 0,
        }
    }

    /// Number of lines; at least one.
    #[must_use]
    pub fn lines_count(&self) -> usize {
        self.index.lines_count()
    }

    /// Total grapheme clusters, each terminator counting as one.
    #[must_use]
    pub fn len_graphemes(&self) -> usize {
        self.index.len_graphemes()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Revision counter, bumped by every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Grapheme length of a line's content, terminator excluded.
    #[must_use]
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.index.line_len(line)
    }

    /// Line text including its terminator (the last line has none).
    #[must_use]
    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.rope.line_text(line)
    }

    /// Line text without its terminator.
    #[must_use]
    pub fn line_content(&self, line: usize) -> Option<String> {
        let text = self.rope.line_text(line)?;
        Some(split_terminator(&text).0.to_string())
    }

    /// Iterate over all lines, terminators included.
    pub fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        (0..self.lines_count()).filter_map(|line| self.line(line))
    }

    /// Whole document as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get the underlying rope.
    #[must_use]
    pub fn rope(&self) -> &RopeWrapper {
        &self.rope
    }

    /// Check that `position` names an existing line and grapheme boundary.
    pub fn validate_position(&self, position: Position) -> Result<()> {
        let Some(line_len) = self.index.line_len(position.line) else {
            return Err(Error::LineOutOfBounds {
                line: position.line,
                lines_count: self.lines_count(),
            });
        };
        if position.character > line_len {
            return Err(Error::PositionOutOfBounds { position, line_len });
        }
        Ok(())
    }

    /// Check both endpoints and their order.
    pub fn validate_range(&self, range: Range) -> Result<()> {
        self.validate_position(range.start)?;
        self.validate_position(range.end)?;
        if range.start > range.end {
            return Err(Error::InvertedRange { range });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid_position(&self, position: Position) -> bool {
        self.validate_position(position).is_ok()
    }

    /// Last position of the document.
    #[must_use]
    pub fn end_position(&self) -> Position {
        let line = self.lines_count() - 1;
        Position::new(line, self.index.line_len(line).unwrap_or(0))
    }

    /// Range covering the whole document.
    #[must_use]
    pub fn full_range(&self) -> Range {
        Range::new(Position::ZERO, self.end_position())
    }

    /// Document-wide grapheme offset of `position`.
    ///
    /// # Panics
    ///
    /// Panics when `position` is not a valid position in this buffer.
    #[must_use]
    pub fn character_index(&self, position: Position) -> usize {
        precondition(self.try_character_index(position))
    }

    pub fn try_character_index(&self, position: Position) -> Result<usize> {
        self.validate_position(position)?;
        Ok(self.index.line_start(position.line).unwrap_or(0) + position.character)
    }

    /// Inverse of [`character_index`](Self::character_index).
    ///
    /// Offsets landing right after a terminator map to the start of the next
    /// line; offsets past the document end yield `None`.
    #[must_use]
    pub fn position_at_character_index(&self, index: usize) -> Option<Position> {
        let line = self.index.line_at(index)?;
        let start = self.index.line_start(line)?;
        Some(Position::new(line, index - start))
    }

    /// Grapheme cluster starting at `position` (a terminator at line end),
    /// or `None` at the end of the document.
    #[must_use]
    pub fn character_at(&self, position: Position) -> Option<String> {
        self.validate_position(position).ok()?;
        let text = self.rope.line_text(position.line)?;
        graphemes(&text).nth(position.character).map(str::to_string)
    }

    /// Text covered by `range`, terminators included.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or inverted range.
    #[must_use]
    pub fn string_in(&self, range: Range) -> String {
        precondition(self.try_string_in(range))
    }

    pub fn try_string_in(&self, range: Range) -> Result<String> {
        let chars = self.char_range(range)?;
        Ok(self.rope.slice_to_string(chars))
    }

    fn char_offset(&self, position: Position) -> Result<usize> {
        self.validate_position(position)?;
        self.rope
            .grapheme_to_char(position.line, position.character)
            .ok_or(Error::PositionOutOfBounds {
                position,
                line_len: self.index.line_len(position.line).unwrap_or(0),
            })
    }

    fn char_range(&self, range: Range) -> Result<std::ops::Range<usize>> {
        self.validate_range(range)?;
        Ok(self.char_offset(range.start)?..self.char_offset(range.end)?)
    }

    /// Insert `text` at `at`; returns the span the text now occupies.
    ///
    /// The span covers whole clusters, so text that joins a neighbouring
    /// cluster (a leading combining mark, a `"\r"` before `"\n"`) widens it.
    /// Nothing changes on error.
    pub fn try_insert(&mut self, text: &str, at: Position) -> Result<Range> {
        Ok(self.try_replace(Range::caret(at), text)?.range)
    }

    /// Remove the half-open `range`; returns the removed text.
    ///
    /// Nothing changes on error.
    pub fn try_remove(&mut self, range: Range) -> Result<String> {
        Ok(self.try_replace(range, "")?.removed)
    }

    /// Replace `range` with `text` in one step.
    ///
    /// The rope is edited in `char` units, so the previous text comes back
    /// exactly even when the edge clusters regroup. Nothing changes on
    /// error; an empty range with empty text leaves the revision alone.
    pub fn try_replace(&mut self, range: Range, text: &str) -> Result<Splice> {
        let chars = self.char_range(range)?;
        let removed = self.rope.slice_to_string(chars.clone());
        if chars.is_empty() && text.is_empty() {
            return Ok(Splice {
                range,
                removed: String::new(),
                replaced: String::new(),
                merged: false,
            });
        }

        self.rope.remove(chars.clone());
        self.rope.insert(chars.start, text);
        self.index.update(
            &self.rope,
            range.start.line,
            range.end.line - range.start.line + 1,
        );
        self.bump_revision();

        let text_end = chars.start + text.chars().count();
        let (lo, start) = self.rope.snap_to_grapheme(chars.start, false);
        let (hi, end) = self.rope.snap_to_grapheme(text_end, true);
        let merged = lo != chars.start || hi != text_end;
        let replaced = if merged {
            format!(
                "{}{removed}{}",
                self.rope.slice_to_string(lo..chars.start),
                self.rope.slice_to_string(text_end..hi)
            )
        } else {
            removed.clone()
        };
        Ok(Splice {
            range: Range::new(start, end),
            removed,
            replaced,
            merged,
        })
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
