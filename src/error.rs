//! Error types for the text engine.
//!
//! Only precondition violations are represented here: a [`Position`] or
//! [`Range`] that does not exist in the current buffer. The panicking entry
//! points (`insert`, `remove`) format these errors in their panic message;
//! the `try_*` variants hand them back to the caller untouched.

use crate::text::{Position, Range};
use std::fmt;

/// Result type alias for text engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for text engine operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Line number past the last line of the buffer.
    LineOutOfBounds { line: usize, lines_count: usize },
    /// Character offset past the end of an existing line.
    PositionOutOfBounds {
        position: Position,
        line_len: usize,
    },
    /// Range whose start is after its end.
    InvertedRange { range: Range },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineOutOfBounds { line, lines_count } => {
                write!(f, "line {line} out of bounds for buffer of {lines_count} lines")
            }
            Self::PositionOutOfBounds { position, line_len } => {
                write!(
                    f,
                    "position ({}, {}) out of bounds for line of length {line_len}",
                    position.line, position.character
                )
            }
            Self::InvertedRange { range } => {
                write!(
                    f,
                    "inverted range ({}, {})..({}, {})",
                    range.start.line, range.start.character, range.end.line, range.end.character
                )
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::LineOutOfBounds {
            line: 7,
            lines_count: 3,
        };
        assert!(err.to_string().contains("line 7"));

        let err = Error::PositionOutOfBounds {
            position: Position::new(1, 9),
            line_len: 4,
        };
        assert!(err.to_string().contains("(1, 9)"));
        assert!(err.to_string().contains("length 4"));

        let err = Error::InvertedRange {
            range: Range::new(Position::new(2, 0), Position::new(1, 0)),
        };
        assert!(err.to_string().starts_with("inverted range"));
    }
}
