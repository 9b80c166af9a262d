//! Line/character coordinates into a [`TextBuffer`](super::TextBuffer).

use super::buffer::TextBuffer;
use std::fmt;

/// Zero-based line and grapheme offset within that line.
///
/// `character` counts grapheme clusters of the line content; the line
/// terminator is a single cluster, so no position can split `"\r\n"`.
/// Ordering is by line, then character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub const ZERO: Self = Self {
        line: 0,
        character: 0,
    };

    #[must_use]
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Position `n` grapheme steps away, crossing line boundaries.
    ///
    /// A terminator counts as one step. Moving forward past the end of a
    /// line lands on character 0 of the next one; moving backward past
    /// character 0 lands before the previous line's terminator. Returns
    /// `None` instead of clamping when the walk leaves the document, so the
    /// calling command can no-op.
    #[must_use]
    pub fn moved(self, n: isize, buffer: &TextBuffer) -> Option<Self> {
        if n == 0 {
            return buffer.is_valid_position(self).then_some(self);
        }
        if !buffer.is_valid_position(self) {
            return None;
        }
        let index = buffer.character_index(self);
        let target = index.checked_add_signed(n)?;
        buffer.position_at_character_index(target)
    }

    /// Move in place; leaves `self` untouched when out of bounds.
    pub fn move_by(&mut self, n: isize, buffer: &TextBuffer) -> bool {
        match self.moved(n, buffer) {
            Some(position) => {
                *self = position;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Half-open span of positions; `end` is exclusive.
///
/// To cover a whole line including its terminator, end at character 0 of
/// the next line. Ranges order by `start`, then `end`, so they can key a
/// sorted map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty range at `position`.
    #[must_use]
    pub const fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Range within a single line.
    #[must_use]
    pub const fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    /// Swap endpoints; used for selections authored backwards.
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// Ensure `start <= end`.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            self.inverted()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `position` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Whether the half-open spans share at least one position.
    ///
    /// Adjacent ranges (`a.end == b.start`) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Clamp both endpoints into `bounds`.
    ///
    /// A range entirely outside `bounds` collapses to an empty range at the
    /// nearest bound.
    #[must_use]
    pub fn clamped(&self, bounds: &Self) -> Self {
        let clamp = |p: Position| p.clamp(bounds.start, bounds.end.max(bounds.start));
        Self {
            start: clamp(self.start),
            end: clamp(self.end),
        }
    }

    /// Lines touched by the range, inclusive.
    #[must_use]
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        let range = self.normalized();
        range.start.line..=range.end.line
    }
}

impl From<std::ops::Range<Position>> for Range {
    fn from(range: std::ops::Range<Position>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
