//! Grapheme line index over a [`RopeWrapper`].
//!
//! Maps each line number to the grapheme offset where it starts and to the
//! length of its content. The rope already knows where lines start in
//! `char` units; this index adds the grapheme view that positions use, and
//! is patched in place after each edit instead of being rebuilt.

use super::rope::RopeWrapper;
use crate::unicode::{grapheme_count, split_terminator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LineSpan {
    /// Grapheme clusters of content, terminator excluded.
    content: usize,
    /// Whether a terminator follows (always one cluster).
    terminated: bool,
}

impl LineSpan {
    fn measure(text: &str) -> Self {
        let (content, terminator) = split_terminator(text);
        Self {
            content: grapheme_count(content),
            terminated: !terminator.is_empty(),
        }
    }

    const fn len(self) -> usize {
        self.content + self.terminated as usize
    }
}

/// Line boundaries in grapheme units.
#[derive(Clone, Debug)]
pub struct LineIndex {
    spans: Vec<LineSpan>,
    /// `starts[i]` is the grapheme offset of line `i`; one extra entry holds
    /// the document length.
    starts: Vec<usize>,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self {
            spans: vec![LineSpan {
                content: 0,
                terminated: false,
            }],
            starts: vec![0, 0],
        }
    }
}

impl LineIndex {
    /// Build the index for the whole rope.
    #[must_use]
    pub fn build(rope: &RopeWrapper) -> Self {
        let mut index = Self {
            spans: Vec::with_capacity(rope.len_lines()),
            starts: Vec::with_capacity(rope.len_lines() + 1),
        };
        for line in 0..rope.len_lines() {
            let text = rope.line_text(line).unwrap_or_default();
            index.spans.push(LineSpan::measure(&text));
        }
        index.recompute_starts(0);
        index
    }

    /// Re-measure after an edit.
    ///
    /// `first_line..first_line + old_count` are the lines the edit touched
    /// before it happened; the rope already holds the edited text. The line
    /// before `first_line` is re-measured as well, since removing text
    /// between `\r` and `\n` rewrites the previous terminator.
    pub fn update(&mut self, rope: &RopeWrapper, first_line: usize, old_count: usize) {
        let first = first_line.saturating_sub(1).min(self.spans.len());
        let old_end = (first_line + old_count).min(self.spans.len());
        let old_count = old_end - first;
        let Some(new_count) = (old_count + rope.len_lines()).checked_sub(self.spans.len()) else {
            *self = Self::build(rope);
            return;
        };

        let fresh = (first..first + new_count)
            .map(|line| LineSpan::measure(&rope.line_text(line).unwrap_or_default()));
        self.spans.splice(first..old_end, fresh);
        self.recompute_starts(first);
        debug_assert_eq!(self.spans.len(), rope.len_lines());
    }

    fn recompute_starts(&mut self, from_line: usize) {
        self.starts.truncate(from_line + 1);
        if self.starts.is_empty() {
            self.starts.push(0);
        }
        let mut offset = self.starts[from_line];
        for span in &self.spans[from_line..] {
            offset += span.len();
            self.starts.push(offset);
        }
    }

    /// Number of lines; at least one.
    #[must_use]
    pub fn lines_count(&self) -> usize {
        self.spans.len()
    }

    /// Total grapheme clusters in the document, terminators included.
    #[must_use]
    pub fn len_graphemes(&self) -> usize {
        self.starts[self.spans.len()]
    }

    /// Grapheme offset where `line` starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.spans.len()).then(|| self.starts[line])
    }

    /// Content length of `line` in graphemes, terminator excluded.
    #[must_use]
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.spans.get(line).map(|span| span.content)
    }

    /// Whether `line` ends with a terminator.
    #[must_use]
    pub fn is_terminated(&self, line: usize) -> bool {
        self.spans.get(line).is_some_and(|span| span.terminated)
    }

    /// Line containing grapheme offset `index`.
    ///
    /// The offset just past a terminator belongs to the following line.
    /// Uses binary search for O(log n) lookup.
    #[must_use]
    pub fn line_at(&self, index: usize) -> Option<usize> {
        if index > self.len_graphemes() {
            return None;
        }
        // Only the last line can be empty, so starts are strictly increasing.
        let line = match self.starts[..self.spans.len()].binary_search(&index) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(text: &str) -> (RopeWrapper, LineIndex) {
        let rope = RopeWrapper::from_str(text);
        let index = LineIndex::build(&rope);
        (rope, index)
    }

    #[test]
    fn test_build_counts_graphemes() {
        let (_, index) = index_of("ab\r\ne\u{0301}\n");
        assert_eq!(index.lines_count(), 3);
        assert_eq!(index.line_len(0), Some(2));
        assert_eq!(index.line_len(1), Some(1));
        assert_eq!(index.line_len(2), Some(0));
        assert_eq!(index.line_start(1), Some(3));
        assert_eq!(index.line_start(2), Some(5));
        assert_eq!(index.len_graphemes(), 5);
        assert!(index.is_terminated(0));
        assert!(!index.is_terminated(2));
    }

    #[test]
    fn test_empty_document() {
        let (_, index) = index_of("");
        assert_eq!(index.lines_count(), 1);
        assert_eq!(index.len_graphemes(), 0);
        assert_eq!(index.line_at(0), Some(0));
        assert_eq!(index.line_at(1), None);
    }

    #[test]
    fn test_line_at() {
        let (_, index) = index_of("ab\ncd\n\nx");
        assert_eq!(index.line_at(0), Some(0));
        assert_eq!(index.line_at(2), Some(0));
        assert_eq!(index.line_at(3), Some(1));
        assert_eq!(index.line_at(6), Some(2));
        assert_eq!(index.line_at(7), Some(3));
        assert_eq!(index.line_at(8), Some(3));
        assert_eq!(index.line_at(9), None);
    }

    #[test]
    fn test_update_matches_rebuild_after_insert() {
        let (mut rope, mut index) = index_of("one\ntwo\nthree");
        rope.insert(5, "X\nY\nZ");
        index.update(&rope, 1, 1);
        let rebuilt = LineIndex::build(&rope);
        assert_eq!(index.spans, rebuilt.spans);
        assert_eq!(index.starts, rebuilt.starts);
    }

    #[test]
    fn test_update_matches_rebuild_after_remove() {
        let (mut rope, mut index) = index_of("one\ntwo\nthree\nfour");
        rope.remove(2..10);
        index.update(&rope, 0, 3);
        let rebuilt = LineIndex::build(&rope);
        assert_eq!(index.spans, rebuilt.spans);
        assert_eq!(index.starts, rebuilt.starts);
    }

    #[test]
    fn test_update_joins_cr_and_lf() {
        let (mut rope, mut index) = index_of("\rx\n");
        assert_eq!(index.lines_count(), 3);
        rope.remove(1..2);
        index.update(&rope, 1, 1);
        assert_eq!(index.lines_count(), 2);
        assert_eq!(index.len_graphemes(), 1);
    }
}
