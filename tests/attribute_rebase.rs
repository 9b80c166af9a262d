//! Style ranges across edits.

mod common;

use codeedit_engine::{Attribute, Position, Range, Rgba, Style, TextAttributes, TextStorage};

fn p(line: usize, character: usize) -> Position {
    Position::new(line, character)
}

fn ranges(storage: &TextStorage) -> Vec<Range> {
    storage.attributes().iter().map(|(range, _)| *range).collect()
}

#[test]
fn insert_inside_range_splits_it() {
    let mut storage = TextStorage::with_text("abcdef");
    storage.add_attribute(Attribute::Foreground(Rgba::RED), Range::on_line(0, 0, 6));
    storage.insert("XY", p(0, 3));

    assert_eq!(storage.text(), "abcXYdef");
    assert_eq!(ranges(&storage), vec![Range::on_line(0, 0, 3), Range::on_line(0, 5, 8)]);
    for (range, style) in storage.attributes().iter() {
        assert_eq!(style.fg, Some(Rgba::RED), "{range} lost its color");
    }
    assert_eq!(storage.string_in(Range::on_line(0, 0, 3)), "abc");
    assert_eq!(storage.string_in(Range::on_line(0, 5, 8)), "def");
}

#[test]
fn newline_insert_moves_ranges_down() {
    let mut storage = TextStorage::with_text("let x = 1;\nlet y = 2;");
    storage.add_style(Style::bold(), Range::on_line(0, 4, 5));
    storage.add_style(Style::bold(), Range::on_line(1, 4, 5));
    storage.insert("\n\n", p(0, 0));

    assert_eq!(ranges(&storage), vec![Range::on_line(2, 4, 5), Range::on_line(3, 4, 5)]);
    assert_eq!(storage.string_in(Range::on_line(2, 4, 5)), "x");
    assert_eq!(storage.string_in(Range::on_line(3, 4, 5)), "y");
}

#[test]
fn insert_splitting_line_carries_tail_ranges() {
    let mut storage = TextStorage::with_text("alpha beta gamma");
    storage.add_style(Style::fg(Rgba::BLUE), Range::on_line(0, 11, 16));
    storage.insert("\n  ", p(0, 10));

    assert_eq!(storage.text(), "alpha beta\n   gamma");
    assert_eq!(ranges(&storage), vec![Range::on_line(1, 3, 8)]);
    assert_eq!(storage.string_in(Range::on_line(1, 3, 8)), "gamma");
}

#[test]
fn multiline_range_survives_edit_before_it() {
    let mut storage = TextStorage::with_text("/* one\ntwo */ code");
    let comment = Range::new(p(0, 0), p(1, 6));
    storage.add_style(Style::fg(Rgba::GREEN), comment);
    let before = storage.string_in(comment);

    storage.insert("// header\n", p(0, 0));
    let moved = ranges(&storage)[0];
    assert_eq!(moved, Range::new(p(1, 0), p(2, 6)));
    assert_eq!(storage.string_in(moved), before);
}

#[test]
fn removal_truncates_overlapping_ranges() {
    let mut storage = TextStorage::with_text("0123456789");
    storage.add_style(Style::bold(), Range::on_line(0, 1, 4));
    storage.add_style(Style::fg(Rgba::RED), Range::on_line(0, 6, 9));
    storage.remove(Range::on_line(0, 3, 7));

    assert_eq!(storage.text(), "012789");
    assert_eq!(ranges(&storage), vec![Range::on_line(0, 1, 3), Range::on_line(0, 3, 5)]);
    assert_eq!(storage.string_in(Range::on_line(0, 3, 5)), "78");
}

#[test]
fn removal_covering_range_drops_it() {
    let (logger, seen) = common::capturing_logger();
    let mut storage = TextStorage::with_text("keep drop keep").with_logger(logger);
    storage.add_style(Style::bold(), Range::on_line(0, 5, 9));
    storage.remove(Range::on_line(0, 4, 10));

    assert!(storage.attributes().is_empty());
    assert!(
        seen.borrow()
            .iter()
            .any(|(_, message)| message.contains("dropping attribute range 0:5..0:9"))
    );
}

#[test]
fn joining_lines_pulls_ranges_up() {
    let mut storage = TextStorage::with_text("ab\ncd\nef");
    storage.add_style(Style::bold(), Range::on_line(1, 1, 2));
    storage.add_style(Style::bold(), Range::on_line(2, 0, 2));
    storage.remove(Range::new(p(0, 2), p(1, 0)));

    assert_eq!(storage.text(), "abcd\nef");
    assert_eq!(ranges(&storage), vec![Range::on_line(0, 3, 4), Range::on_line(1, 0, 2)]);
}

#[test]
fn collapsed_ranges_merge_styles() {
    let mut storage = TextStorage::with_text("abcdef");
    storage.add_style(Style::fg(Rgba::RED), Range::on_line(0, 0, 2));
    storage.add_style(Style::bold(), Range::on_line(0, 0, 4));
    storage.remove(Range::on_line(0, 2, 4));

    assert_eq!(storage.attributes().len(), 1);
    let style = storage.attributes().get(&Range::on_line(0, 0, 2)).unwrap();
    assert_eq!(style.fg, Some(Rgba::RED));
    assert!(style.attributes.contains(TextAttributes::BOLD));
}

#[test]
fn add_attribute_merges_same_range() {
    let mut storage = TextStorage::with_text("word");
    let range = Range::on_line(0, 0, 4);
    storage.add_attribute(Attribute::Foreground(Rgba::RED), range);
    storage.add_attribute(Attribute::Foreground(Rgba::BLUE), range);
    storage.add_attribute(Attribute::Flags(TextAttributes::ITALIC), range);

    assert_eq!(storage.attributes().len(), 1);
    let style = storage.attributes().get(&range).unwrap();
    assert_eq!(style.fg, Some(Rgba::BLUE));
    assert_eq!(style.attributes, TextAttributes::ITALIC);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn add_attribute_outside_buffer_panics() {
    let mut storage = TextStorage::with_text("ab");
    storage.add_attribute(Attribute::Flags(TextAttributes::BOLD), Range::on_line(3, 0, 1));
}
