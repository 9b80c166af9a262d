//! Replayable edit operations.
//!
//! Every [`TextChange`](super::TextChange) can produce the [`Edit`] that
//! undoes it, so an undo stack living outside the crate only has to store
//! edits and replay them through [`Document::apply`](crate::Document::apply).

use super::position::{Position, Range};
use std::fmt;

/// A single buffer mutation that can be replayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Insert { text: String, at: Position },
    Remove { range: Range },
    Replace { range: Range, text: String },
}

impl Edit {
    #[must_use]
    pub fn insert(text: impl Into<String>, at: Position) -> Self {
        Self::Insert {
            text: text.into(),
            at,
        }
    }

    #[must_use]
    pub const fn remove(range: Range) -> Self {
        Self::Remove { range }
    }

    #[must_use]
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self::Replace {
            range,
            text: text.into(),
        }
    }

    /// First position the edit touches.
    #[must_use]
    pub const fn start(&self) -> Position {
        match self {
            Self::Insert { at, .. } => *at,
            Self::Remove { range } | Self::Replace { range, .. } => range.start,
        }
    }

    /// Whether applying the edit would leave the buffer unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Insert { text, .. } => text.is_empty(),
            Self::Remove { range } => range.is_empty(),
            Self::Replace { range, text } => range.is_empty() && text.is_empty(),
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { text, at } => write!(f, "insert {text:?} at {at}"),
            Self::Remove { range } => write!(f, "remove {range}"),
            Self::Replace { range, text } => write!(f, "replace {range} with {text:?}"),
        }
    }
}
