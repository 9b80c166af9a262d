//! Style ranges that follow the text through edits.
//!
//! The table maps [`Range`] keys to [`Style`] sets. Keys are always
//! non-empty and valid for the buffer they annotate; the storage rebases them
//! inside every insert and remove before anyone else observes the change.

use super::position::{Position, Range};
use crate::event::{LogLevel, Logger};
use crate::style::{Attribute, Style};
use std::collections::BTreeMap;

/// Sorted map from ranges to the styles applied over them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeTable {
    entries: BTreeMap<Range, Style>,
}

impl AttributeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Style stored for exactly `range`.
    #[must_use]
    pub fn get(&self, range: &Range) -> Option<&Style> {
        self.entries.get(range)
    }

    /// Entries ordered by start, then end.
    pub fn iter(&self) -> impl Iterator<Item = (&Range, &Style)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge `style` into the entry keyed by exactly `range`.
    ///
    /// Overlapping but unequal ranges stay separate entries. Empty ranges
    /// are ignored.
    pub fn add(&mut self, style: Style, range: Range) {
        if range.is_empty() {
            return;
        }
        self.insert_merged(range, style);
    }

    /// Set a single attribute over `range`.
    pub fn add_attribute(&mut self, attribute: Attribute, range: Range) {
        self.add(Style::from_attribute(attribute), range);
    }

    /// Remove the entry keyed by exactly `range`.
    pub fn remove(&mut self, range: &Range) -> Option<Style> {
        self.entries.remove(range)
    }

    fn insert_merged(&mut self, range: Range, style: Style) {
        self.entries
            .entry(range)
            .and_modify(|existing| *existing = existing.merge(&style))
            .or_insert(style);
    }

    /// Rebase after `at..end` was inserted.
    ///
    /// Ranges ending at or before `at` keep their keys. Ranges starting at or
    /// after `at` move with the text. A range straddling `at` is split so the
    /// inserted text stays unstyled.
    pub fn rebase_after_insert(&mut self, at: Position, end: Position) {
        if at >= end {
            return;
        }
        let tail = self.entries.split_off(&Range::caret(at));
        let straddling: Vec<Range> = self
            .entries
            .keys()
            .filter(|range| range.end > at)
            .copied()
            .collect();

        for range in straddling {
            if let Some(style) = self.entries.remove(&range) {
                let after = Range::new(end, shift_after_insert(range.end, at, end));
                self.insert_merged(Range::new(range.start, at), style.clone());
                self.insert_merged(after, style);
            }
        }
        for (range, style) in tail {
            let shifted = Range::new(
                shift_after_insert(range.start, at, end),
                shift_after_insert(range.end, at, end),
            );
            self.insert_merged(shifted, style);
        }
    }

    /// Rebase after the half-open `removed` range was deleted.
    ///
    /// `removed` is in pre-removal coordinates. Ranges inside it are dropped,
    /// overlapping ones truncated, later ones pulled back. Keys that collide
    /// merge their styles.
    pub fn rebase_after_remove(&mut self, removed: Range, logger: &Logger) {
        if removed.is_empty() {
            return;
        }
        let Range { start, end } = removed;
        let entries = std::mem::take(&mut self.entries);

        for (range, style) in entries {
            if range.end <= start {
                self.insert_merged(range, style);
                continue;
            }
            let new_start = if range.start < start {
                range.start
            } else {
                shift_after_remove(range.start.max(end), start, end)
            };
            let new_end = if range.end > end {
                shift_after_remove(range.end, start, end)
            } else {
                start
            };
            let rebased = Range::new(new_start, new_end);
            if rebased.is_empty() {
                logger.emit_with(LogLevel::Debug, || {
                    format!("dropping attribute range {range}: emptied by removal of {removed}")
                });
                continue;
            }
            self.insert_merged(rebased, style);
        }
    }

    /// Drop every range that `is_valid` rejects.
    ///
    /// Used when an edit joined or split a terminator at its boundary, which
    /// the positional rebase cannot predict. Returns how many were dropped.
    pub fn retain_valid<F>(&mut self, mut is_valid: F, logger: &Logger) -> usize
    where
        F: FnMut(&Range) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|range, _| {
            let keep = is_valid(range);
            if !keep {
                logger.emit_with(LogLevel::Debug, || {
                    format!("dropping attribute range {range}: no longer in the buffer")
                });
            }
            keep
        });
        before - self.entries.len()
    }

    /// Styles overlapping `line`, as grapheme ranges within its content.
    ///
    /// `line_len` is the content length; a range covering the terminator is
    /// clipped to it. Empty clips are skipped.
    #[must_use]
    pub fn styles_on_line(&self, line: usize, line_len: usize) -> Vec<(std::ops::Range<usize>, Style)> {
        let upper = Range::caret(Position::new(line, usize::MAX));
        self.entries
            .range(..=upper)
            .filter(|(range, _)| range.end.line >= line)
            .filter_map(|(range, style)| {
                let start = if range.start.line == line {
                    range.start.character.min(line_len)
                } else {
                    0
                };
                let end = if range.end.line == line {
                    range.end.character.min(line_len)
                } else {
                    line_len
                };
                (start < end).then(|| (start..end, style.clone()))
            })
            .collect()
    }
}

/// Where `p >= at` lands after inserting `at..end`.
fn shift_after_insert(p: Position, at: Position, end: Position) -> Position {
    if p < at {
        p
    } else if p.line == at.line {
        Position::new(end.line, end.character + (p.character - at.character))
    } else {
        Position::new(p.line + (end.line - at.line), p.character)
    }
}

/// Where `p >= end` lands after removing `start..end`.
fn shift_after_remove(p: Position, start: Position, end: Position) -> Position {
    if p.line == end.line {
        Position::new(start.line, start.character + (p.character - end.character))
    } else {
        Position::new(p.line - (end.line - start.line), p.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::style::TextAttributes;

    fn p(line: usize, character: usize) -> Position {
        Position::new(line, character)
    }

    fn keys(table: &AttributeTable) -> Vec<Range> {
        table.iter().map(|(range, _)| *range).collect()
    }

    #[test]
    fn test_add_merges_exact_key() {
        let mut table = AttributeTable::new();
        let range = Range::on_line(0, 1, 4);
        table.add(Style::fg(Rgba::RED), range);
        table.add_attribute(Attribute::Flags(TextAttributes::BOLD), range);
        table.add(Style::bg(Rgba::BLUE), Range::on_line(0, 2, 4));

        assert_eq!(table.len(), 2);
        let style = table.get(&range).unwrap();
        assert_eq!(style.fg, Some(Rgba::RED));
        assert!(style.attributes.contains(TextAttributes::BOLD));
    }

    #[test]
    fn test_add_ignores_empty_range() {
        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::caret(p(0, 3)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_splits_straddling_range() {
        let mut table = AttributeTable::new();
        table.add(Style::fg(Rgba::GREEN), Range::on_line(0, 0, 6));
        table.rebase_after_insert(p(0, 3), p(0, 5));

        assert_eq!(keys(&table), vec![Range::on_line(0, 0, 3), Range::on_line(0, 5, 8)]);
        assert!(table.iter().all(|(_, style)| style.fg == Some(Rgba::GREEN)));
    }

    #[test]
    fn test_insert_shifts_following_ranges() {
        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::on_line(0, 4, 6));
        table.add(Style::bold(), Range::on_line(2, 0, 3));
        table.add(Style::bold(), Range::on_line(0, 0, 2));
        // "\nxy" inserted at 0:2 ends at 1:2
        table.rebase_after_insert(p(0, 2), p(1, 2));

        assert_eq!(
            keys(&table),
            vec![Range::on_line(0, 0, 2), Range::on_line(1, 4, 6), Range::on_line(3, 0, 3)]
        );
    }

    #[test]
    fn test_insert_at_range_start_moves_range() {
        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::on_line(0, 2, 4));
        table.rebase_after_insert(p(0, 2), p(0, 3));
        assert_eq!(keys(&table), vec![Range::on_line(0, 3, 5)]);
    }

    #[test]
    fn test_remove_truncates_and_drops() {
        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::on_line(0, 0, 3));
        table.add(Style::fg(Rgba::RED), Range::on_line(0, 3, 5));
        table.add(Style::bg(Rgba::BLUE), Range::on_line(0, 4, 9));
        table.add(Style::fg(Rgba::WHITE), Range::on_line(0, 9, 10));
        table.rebase_after_remove(Range::on_line(0, 2, 6), &Logger::disabled());

        assert_eq!(
            keys(&table),
            vec![Range::on_line(0, 0, 2), Range::on_line(0, 2, 5), Range::on_line(0, 5, 6)]
        );
    }

    #[test]
    fn test_remove_across_lines_pulls_back() {
        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::new(p(2, 1), p(3, 2)));
        table.add(Style::bold(), Range::on_line(4, 0, 1));
        table.rebase_after_remove(Range::new(p(0, 2), p(2, 0)), &Logger::disabled());

        assert_eq!(
            keys(&table),
            vec![Range::new(p(0, 3), p(1, 2)), Range::on_line(2, 0, 1)]
        );
    }

    #[test]
    fn test_remove_merges_colliding_keys() {
        let mut table = AttributeTable::new();
        table.add(Style::fg(Rgba::RED), Range::on_line(0, 0, 2));
        table.add(Style::bold(), Range::on_line(0, 0, 4));
        table.rebase_after_remove(Range::on_line(0, 2, 4), &Logger::disabled());

        assert_eq!(keys(&table), vec![Range::on_line(0, 0, 2)]);
        let style = table.get(&Range::on_line(0, 0, 2)).unwrap();
        assert_eq!(style.fg, Some(Rgba::RED));
        assert!(style.attributes.contains(TextAttributes::BOLD));
    }

    #[test]
    fn test_dropped_range_is_logged() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let logger = Logger::new(move |_, msg| sink.borrow_mut().push(msg.to_string()));

        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::on_line(0, 1, 2));
        table.rebase_after_remove(Range::on_line(0, 0, 3), &logger);

        assert!(table.is_empty());
        assert_eq!(seen.borrow().len(), 1);
        assert!(seen.borrow()[0].contains("0:1..0:2"));
    }

    #[test]
    fn test_styles_on_line_clips() {
        let mut table = AttributeTable::new();
        table.add(Style::bold(), Range::new(p(0, 3), p(2, 1)));
        table.add(Style::fg(Rgba::RED), Range::on_line(1, 2, 4));
        table.add(Style::fg(Rgba::BLUE), Range::on_line(3, 0, 1));

        let line1: Vec<_> = table
            .styles_on_line(1, 5)
            .into_iter()
            .map(|(range, _)| range)
            .collect();
        assert_eq!(line1, vec![0..5, 2..4]);

        let line0: Vec<_> = table.styles_on_line(0, 3).into_iter().map(|(r, _)| r).collect();
        assert!(line0.is_empty());
        assert_eq!(table.styles_on_line(2, 4).len(), 1);
    }
}
