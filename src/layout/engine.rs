//! Incremental line layout cache.
//!
//! The cache holds one slot of rows per logical line, indexed by line
//! number. A [`TextChange`] splices invalid slots in place of the lines it
//! touched; the next [`LayoutEngine::layout`] pass measures only those
//! slots and shifts the rows below them by the net height delta.
//!
//! Row widths are tallied as slots are replaced, so the content width after
//! a pass costs a map lookup rather than a scan of every row.

// Layout arithmetic is in f64 while counts are usize
#![allow(clippy::cast_precision_loss)]

use super::config::{LayoutConfiguration, LineWrapping};
use super::geometry::{Point, Rect, Size};
use super::measure::{BreakMode, LineRun, TextMeasurer, Typography};
use crate::event::{Clock, LogLevel, Logger, SystemClock};
use crate::text::{Position, Range, TextChange, TextStorage};
use crate::unicode::grapheme_count;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// One row of laid-out text.
///
/// A logical line produces one record per wrapped row. `bounds.y` is the
/// top of the row; `line_spacing` is the gap below it.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    pub line_number: usize,
    /// Graphemes of the line this row shows, always on `line_number`.
    pub source_range: Range,
    pub bounds: Rect,
    /// Distance from the row top to its baseline.
    pub baseline_offset: f64,
    pub line_spacing: f64,
    /// Caret x offsets relative to `bounds.x`, one per grapheme boundary.
    pub caret_offsets: Vec<f64>,
}

impl LineLayout {
    /// Whether the row shows `position`.
    ///
    /// The boundary between two rows belongs to the later one; the end of
    /// the line belongs to its last row, which `is_last_row` marks.
    fn shows(&self, character: usize, is_last_row: bool) -> bool {
        let start = self.source_range.start.character;
        let end = self.source_range.end.character;
        start <= character && (character < end || (is_last_row && character == end))
    }

    /// Caret x offset for `character` within this row, relative to
    /// `bounds.x`.
    fn caret_offset(&self, character: usize) -> f64 {
        let index = character.saturating_sub(self.source_range.start.character);
        if let Some(offset) = self.caret_offsets.get(index) {
            return *offset;
        }
        // Missing offsets: spread the width evenly.
        let count = self.grapheme_count();
        if count == 0 {
            return 0.0;
        }
        self.bounds.width / count as f64 * index.min(count) as f64
    }

    fn grapheme_count(&self) -> usize {
        self.source_range.end.character - self.source_range.start.character
    }

    /// Character in this row whose caret boundary is nearest to `x`.
    fn character_near(&self, x: f64, is_last_row: bool) -> usize {
        let local = x - self.bounds.x;
        let count = self.grapheme_count();
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for index in 0..=count {
            let distance = (self.caret_offset(self.source_range.start.character + index) - local).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        // the row end is the next row's start unless this row ends the line
        if !is_last_row && count > 0 {
            best = best.min(count - 1);
        }
        self.source_range.start.character + best
    }

    fn grown_bottom(&self) -> f64 {
        self.bounds.max_y() + self.line_spacing / 2.0
    }

    fn visible_bounds(&self) -> (f64, f64) {
        let bounds = self.bounds.inset_by(0.0, -self.line_spacing / 2.0);
        (bounds.y, bounds.max_y())
    }

    fn move_to(&mut self, line: usize, dy: f64) {
        self.line_number = line;
        self.source_range.start.line = line;
        self.source_range.end.line = line;
        self.bounds.y += dy;
    }
}

#[derive(Clone, Debug, Default)]
struct LineSlot {
    rows: Vec<LineLayout>,
    valid: bool,
}

impl LineSlot {
    const fn invalid() -> Self {
        Self {
            rows: Vec::new(),
            valid: false,
        }
    }

    fn top(&self) -> Option<f64> {
        self.rows.first().map(|row| row.bounds.y)
    }

    /// Where the next line's first row starts.
    fn next_y(&self) -> Option<f64> {
        self.rows.last().map(|row| row.bounds.max_y() + row.line_spacing)
    }
}

/// Multiset of row widths.
#[derive(Clone, Debug, Default)]
struct WidthTally(BTreeMap<u64, usize>);

impl WidthTally {
    // bit patterns of non-negative floats sort like the floats themselves
    fn key(width: f64) -> u64 {
        if width > 0.0 { width.to_bits() } else { 0 }
    }

    fn add(&mut self, rows: &[LineLayout]) {
        for row in rows {
            *self.0.entry(Self::key(row.bounds.width)).or_insert(0) += 1;
        }
    }

    fn remove(&mut self, rows: &[LineLayout]) {
        for row in rows {
            let key = Self::key(row.bounds.width);
            if let Some(count) = self.0.get_mut(&key) {
                *count -= 1;
                if *count == 0 {
                    self.0.remove(&key);
                }
            }
        }
    }

    fn widest(&self) -> f64 {
        self.0.last_key_value().map_or(0.0, |(key, _)| f64::from_bits(*key))
    }
}

/// Layout statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    pub passes: u64,
    /// Logical lines measured by the last pass.
    pub last_pass_lines: usize,
    /// Rows moved without re-measuring by the last pass.
    pub last_pass_shifted_rows: usize,
    pub total_lines_measured: u64,
    pub full_invalidations: u64,
    pub last_pass_time: Duration,
}

/// Turns buffer content into positioned rows and keeps them current.
pub struct LayoutEngine {
    configuration: LayoutConfiguration,
    slots: Vec<LineSlot>,
    widths: WidthTally,
    /// Lowest line whose slot is invalid or has stale geometry.
    first_dirty: Option<usize>,
    needs_full_layout: bool,
    frame_width: Option<f64>,
    content_size: Size,
    em_width: f64,
    stats: LayoutStats,
    logger: Logger,
    clock: Box<dyn Clock>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfiguration::default())
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("configuration", &self.configuration)
            .field("lines", &self.slots.len())
            .field("first_dirty", &self.first_dirty)
            .field("needs_full_layout", &self.needs_full_layout)
            .field("content_size", &self.content_size)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    #[must_use]
    pub fn new(configuration: LayoutConfiguration) -> Self {
        Self {
            configuration,
            slots: Vec::new(),
            widths: WidthTally::default(),
            first_dirty: None,
            needs_full_layout: true,
            frame_width: None,
            content_size: Size::ZERO,
            em_width: 0.0,
            stats: LayoutStats::default(),
            logger: Logger::disabled(),
            clock: Box::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Use `clock` to time layout passes.
    #[must_use]
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    #[must_use]
    pub fn configuration(&self) -> &LayoutConfiguration {
        &self.configuration
    }

    /// Replace the configuration; any difference invalidates every line.
    pub fn set_configuration(&mut self, configuration: LayoutConfiguration) {
        if configuration != self.configuration {
            self.configuration = configuration;
            self.invalidate_all();
        }
    }

    #[must_use]
    pub fn stats(&self) -> &LayoutStats {
        &self.stats
    }

    /// Content size computed by the last pass.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Whether the next pass has work to do.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.needs_full_layout || self.first_dirty.is_some()
    }

    /// Drop every cached row; the next pass lays out the whole document.
    pub fn invalidate_all(&mut self) {
        if !self.needs_full_layout {
            self.stats.full_invalidations += 1;
        }
        self.needs_full_layout = true;
    }

    /// Mark the lines touched by `change` invalid.
    ///
    /// Slots are spliced immediately so line numbers keep matching the
    /// buffer between passes. Changes that the line arithmetic cannot place,
    /// or that dropped style ranges on lines they did not touch, fall back
    /// to a full invalidation.
    pub fn invalidate(&mut self, change: &TextChange) {
        if self.needs_full_layout {
            return;
        }
        if change.attributes_dropped {
            self.logger.emit_with(LogLevel::Debug, || {
                format!("change at {} dropped style ranges, invalidating layout", change.range)
            });
            self.invalidate_all();
            return;
        }
        let old = change.old_line_span();
        let new_len = old.len().checked_add_signed(change.line_delta);
        let (Some(new_len), true) = (new_len, old.end <= self.slots.len()) else {
            self.logger
                .warn(&format!("cannot place change at {}, invalidating layout", change.range));
            self.invalidate_all();
            return;
        };
        if new_len == 0 {
            self.invalidate_all();
            return;
        }

        let first = old.start;
        let removed: Vec<LineSlot> = self
            .slots
            .splice(old, std::iter::repeat_with(LineSlot::invalid).take(new_len))
            .collect();
        for slot in &removed {
            self.widths.remove(&slot.rows);
        }
        self.first_dirty = Some(self.first_dirty.map_or(first, |dirty| dirty.min(first)));
        self.logger.emit_with(LogLevel::Debug, || {
            format!("invalidated lines {first}..{} ({:+} lines)", first + new_len, change.line_delta)
        });
    }

    /// Mark `lines` invalid without changing the line count, e.g. after
    /// their styles changed.
    pub fn invalidate_lines(&mut self, lines: std::ops::RangeInclusive<usize>) {
        if self.needs_full_layout {
            return;
        }
        let first = *lines.start();
        let mut touched = false;
        for slot in self.slots.iter_mut().skip(first).take(lines.count()) {
            slot.valid = false;
            touched = true;
        }
        if touched {
            self.first_dirty = Some(self.first_dirty.map_or(first, |dirty| dirty.min(first)));
        }
    }

    /// Bring the cache up to date and return the content size.
    ///
    /// Only invalid lines are measured; rows below them move by the net
    /// height change. With [`LineWrapping::FitToWidth`], a new
    /// `frame_width` invalidates everything.
    pub fn layout<M>(
        &mut self,
        storage: &TextStorage,
        measurer: &M,
        typography: &Typography,
        frame_width: f64,
    ) -> Size
    where
        M: TextMeasurer + ?Sized,
    {
        let started = self.clock.now();
        let frame_changed = self.frame_width != Some(frame_width);
        if frame_changed && self.configuration.line_wrapping == LineWrapping::FitToWidth {
            self.invalidate_all();
        }
        self.frame_width = Some(frame_width);

        if !self.needs_full_layout && self.slots.len() != storage.lines_count() {
            self.logger.warn(&format!(
                "layout holds {} lines, buffer has {}; relayout",
                self.slots.len(),
                storage.lines_count()
            ));
            self.invalidate_all();
        }
        if self.needs_full_layout {
            self.slots = (0..storage.lines_count()).map(|_| LineSlot::invalid()).collect();
            self.widths = WidthTally::default();
            self.first_dirty = Some(0);
            self.needs_full_layout = false;
        }

        self.stats.passes += 1;
        self.stats.last_pass_lines = 0;
        self.stats.last_pass_shifted_rows = 0;

        if let Some(first) = self.first_dirty.take() {
            self.logger
                .emit_with(LogLevel::Debug, || format!("layout pass from line {first}"));
            self.em_width = measurer.em_width(typography);
            let configuration = self.configuration.clone();
            let pass = Pass {
                storage,
                measurer,
                typography,
                configuration: &configuration,
                wrap_width: self.configuration.wrap_width(frame_width),
                indent: self.configuration.continuation_indent(self.em_width),
            };
            self.relayout_from(first, &pass);
            let overscroll = self
                .configuration
                .overscroll
                .resolve(measurer.line_height(typography));
            self.content_size = self.measure_content(overscroll);
        }

        self.stats.last_pass_time = self.clock.elapsed(started);
        self.logger.emit_with(LogLevel::Debug, || {
            format!(
                "layout pass done: {} lines measured, {} rows shifted, content {}x{}",
                self.stats.last_pass_lines,
                self.stats.last_pass_shifted_rows,
                self.content_size.width,
                self.content_size.height
            )
        });
        self.content_size
    }

    fn relayout_from<M>(&mut self, first: usize, pass: &Pass<'_, M>)
    where
        M: TextMeasurer + ?Sized,
    {
        let last_invalid = self.slots.iter().rposition(|slot| !slot.valid);
        let mut y = first
            .checked_sub(1)
            .and_then(|previous| self.slots[previous].next_y());

        for line in first..self.slots.len() {
            let slot = &mut self.slots[line];
            if slot.valid {
                let top = slot.top().unwrap_or(0.0);
                let dy = y.map_or(0.0, |y| y - top);
                let renumber = slot.rows.first().is_some_and(|row| row.line_number != line);
                if dy == 0.0 && !renumber && last_invalid.is_none_or(|last| line > last) {
                    break;
                }
                for row in &mut slot.rows {
                    row.move_to(line, dy);
                }
                self.stats.last_pass_shifted_rows += slot.rows.len();
            } else {
                self.widths.remove(&slot.rows);
                slot.rows = pass.build_rows(line, y);
                self.widths.add(&slot.rows);
                slot.valid = true;
                self.stats.last_pass_lines += 1;
                self.stats.total_lines_measured += 1;
            }
            y = slot.next_y();
        }
    }

    fn measure_content(&self, overscroll: f64) -> Size {
        let width = self.widths.widest();
        let bottom = self
            .slots
            .last()
            .and_then(|slot| slot.rows.last())
            .map_or(0.0, |row| row.bounds.max_y());
        Size::new(width, bottom + overscroll)
    }

    /// Every row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &LineLayout> {
        self.slots.iter().flat_map(|slot| slot.rows.iter())
    }

    /// Rows of logical line `line`; empty when not laid out.
    #[must_use]
    pub fn line_layouts_for_line(&self, line: usize) -> &[LineLayout] {
        self.slots
            .get(line)
            .map(|slot| slot.rows.as_slice())
            .unwrap_or_default()
    }

    /// Row showing `position`.
    #[must_use]
    pub fn line_layout_at_position(&self, position: Position) -> Option<&LineLayout> {
        let rows = self.line_layouts_for_line(position.line);
        let last = rows.len().checked_sub(1)?;
        rows.iter()
            .enumerate()
            .find(|(index, row)| row.shows(position.character, *index == last))
            .map(|(_, row)| row)
    }

    /// Row under `point.y`.
    ///
    /// Each row owns the band from the previous row's bottom to its own,
    /// where a bottom is the row bounds grown by half the row's spacing.
    /// Bands tile the column even when rows differ in height. Above the
    /// first row's grown top, or below the last row, nothing is hit.
    #[must_use]
    pub fn line_layout_at_point(&self, point: Point) -> Option<&LineLayout> {
        let y = point.y;
        let first = self
            .slots
            .partition_point(|slot| slot.rows.last().is_some_and(|row| row.grown_bottom() < y));
        let row = self.slots[first..]
            .iter()
            .flat_map(|slot| slot.rows.iter())
            .find(|row| y <= row.grown_bottom())?;
        let is_first_row = self.rows().next().is_some_and(|top| std::ptr::eq(top, row));
        if is_first_row && y < row.visible_bounds().0 {
            return None;
        }
        Some(row)
    }

    /// Rows intersecting `rect`.
    #[must_use]
    pub fn line_layouts_in(&self, rect: Rect) -> Vec<&LineLayout> {
        let first = self.first_slot_below(rect.y);
        self.slots[first..]
            .iter()
            .flat_map(|slot| slot.rows.iter())
            .take_while(|row| row.bounds.y <= rect.max_y())
            .filter(|row| rect.intersects(&row.bounds))
            .collect()
    }

    /// Caret rectangle at `position`, one em wide.
    #[must_use]
    pub fn caret_bounds(&self, position: Position) -> Option<Rect> {
        let row = self.line_layout_at_position(position)?;
        let x = row.bounds.x + row.caret_offset(position.character);
        Some(Rect::new(x, row.bounds.y, self.em_width, row.bounds.height))
    }

    /// Position nearest to `point`, clamped to the row under it.
    #[must_use]
    pub fn position_at_point(&self, point: Point) -> Option<Position> {
        let row = self.line_layout_at_point(point)?;
        Some(self.position_in_row(row, point.x))
    }

    fn position_in_row(&self, row: &LineLayout, x: f64) -> Position {
        let is_last = self
            .line_layouts_for_line(row.line_number)
            .last()
            .is_some_and(|last| last.source_range == row.source_range);
        Position::new(row.line_number, row.character_near(x, is_last))
    }

    /// Row following `row`, crossing into the next line.
    #[must_use]
    pub fn line_layout_after(&self, row: &LineLayout) -> Option<&LineLayout> {
        let (line, index) = self.locate(row)?;
        let rows = &self.slots[line].rows;
        rows.get(index + 1).or_else(|| {
            self.slots[line + 1..]
                .iter()
                .find_map(|slot| slot.rows.first())
        })
    }

    /// Row preceding `row`, crossing into the previous line.
    #[must_use]
    pub fn line_layout_before(&self, row: &LineLayout) -> Option<&LineLayout> {
        let (line, index) = self.locate(row)?;
        if index > 0 {
            return self.slots[line].rows.get(index - 1);
        }
        self.slots[..line]
            .iter()
            .rev()
            .find_map(|slot| slot.rows.last())
    }

    /// Position one row up, keeping the caret x.
    #[must_use]
    pub fn position_above(&self, position: Position) -> Option<Position> {
        let caret = self.caret_bounds(position)?;
        let row = self.line_layout_at_position(position)?;
        let target = self.line_layout_before(row)?;
        Some(self.position_in_row(target, caret.x))
    }

    /// Position one row down, keeping the caret x.
    #[must_use]
    pub fn position_below(&self, position: Position) -> Option<Position> {
        let caret = self.caret_bounds(position)?;
        let row = self.line_layout_at_position(position)?;
        let target = self.line_layout_after(row)?;
        Some(self.position_in_row(target, caret.x))
    }

    fn locate(&self, row: &LineLayout) -> Option<(usize, usize)> {
        let rows = &self.slots.get(row.line_number)?.rows;
        let index = rows
            .iter()
            .position(|candidate| candidate.source_range == row.source_range)?;
        Some((row.line_number, index))
    }

    /// First slot whose last row ends at or below `y`.
    fn first_slot_below(&self, y: f64) -> usize {
        self.slots
            .partition_point(|slot| slot.rows.last().is_some_and(|row| row.bounds.max_y() < y))
    }
}

/// Inputs shared by every line of one layout pass.
struct Pass<'a, M: ?Sized> {
    storage: &'a TextStorage,
    measurer: &'a M,
    typography: &'a Typography,
    configuration: &'a LayoutConfiguration,
    wrap_width: Option<f64>,
    indent: f64,
}

impl<M> Pass<'_, M>
where
    M: TextMeasurer + ?Sized,
{
    /// Measure and wrap one logical line starting at `y`.
    ///
    /// `y` is `None` for the first line of the document, which is placed
    /// half a spacing below the top.
    fn build_rows(&self, line: usize, y: Option<f64>) -> Vec<LineLayout> {
        let content = self.storage.line_content(line).unwrap_or_default();
        let len = grapheme_count(&content);
        let overrides = self.storage.attributes().styles_on_line(line, len);
        let run = LineRun::new(&content, self.typography, &overrides);
        let mode = if self.configuration.wrap_on_word_boundaries {
            BreakMode::Word
        } else {
            BreakMode::Cluster
        };

        let mut rows = Vec::with_capacity(1);
        let mut y = y;
        let mut start = 0;
        loop {
            let x = if start == 0 { 0.0 } else { self.indent };
            let count = match self.wrap_width {
                Some(width) if start < len => self
                    .measurer
                    .suggest_break(&run, start, width - x, mode)
                    .clamp(1, len - start),
                _ => len - start,
            };
            let metrics = self.measurer.measure(&run, start..start + count);
            let height = metrics.height();
            let line_spacing = self.configuration.line_spacing.spacing_for(height);
            let top = *y.get_or_insert_with(|| (line_spacing / 2.0).round());

            rows.push(LineLayout {
                line_number: line,
                source_range: Range::on_line(line, start, start + count),
                bounds: Rect::new(x, top, metrics.width, height),
                baseline_offset: metrics.ascent,
                line_spacing,
                caret_offsets: metrics.caret_offsets,
            });

            y = Some(top + height + line_spacing);
            start += count;
            if start >= len {
                break;
            }
        }
        rows
    }
}
