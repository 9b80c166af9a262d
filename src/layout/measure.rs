//! Text measurement boundary.
//!
//! The layout engine never shapes glyphs itself. It hands each logical line
//! to a [`TextMeasurer`] as a [`LineRun`] and asks where rows should break
//! and how large they are. [`MonospaceMeasurer`] is a cell-grid
//! implementation for terminals and tests.

use crate::color::Rgba;
use crate::style::{Font, Style};
use crate::unicode::{WidthMethod, grapheme_cells, graphemes, is_whitespace};
use std::ops::Range;

/// Default font and color for text without overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct Typography {
    pub font: Font,
    pub color: Rgba,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font: Font::default(),
            color: Rgba::BLACK,
        }
    }
}

impl Typography {
    #[must_use]
    pub const fn new(font: Font, color: Rgba) -> Self {
        Self { font, color }
    }
}

/// One logical line prepared for measurement.
///
/// Ranges passed alongside a run are grapheme ranges into `text`.
#[derive(Clone, Copy, Debug)]
pub struct LineRun<'a> {
    /// Line content without its terminator.
    pub text: &'a str,
    pub typography: &'a Typography,
    /// Style overrides clipped to this line, in grapheme units.
    pub overrides: &'a [(Range<usize>, Style)],
}

impl<'a> LineRun<'a> {
    #[must_use]
    pub const fn new(
        text: &'a str,
        typography: &'a Typography,
        overrides: &'a [(Range<usize>, Style)],
    ) -> Self {
        Self {
            text,
            typography,
            overrides,
        }
    }

    /// Font in effect at grapheme `index`; later overrides win.
    #[must_use]
    pub fn font_at(&self, index: usize) -> &'a Font {
        self.overrides
            .iter()
            .rev()
            .filter(|(range, _)| range.contains(&index))
            .find_map(|(_, style)| style.font.as_ref())
            .unwrap_or(&self.typography.font)
    }
}

/// Break strategy requested from the measurer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakMode {
    /// Prefer breaking after whitespace; fall back to clusters for words
    /// longer than the row.
    Word,
    /// Break at any grapheme cluster.
    Cluster,
}

/// Metrics of one measured row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Typographic width, trailing whitespace excluded.
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub leading: f64,
    /// Caret x offsets relative to the row start, one per grapheme boundary
    /// of the measured range (count + 1). May be empty if unavailable.
    pub caret_offsets: Vec<f64>,
}

impl LineMetrics {
    /// Row height, rounded to whole units.
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.ascent + self.descent + self.leading).round()
    }
}

/// Measurement provider used by the layout engine.
pub trait TextMeasurer {
    /// Measure graphemes `range` of `run` as one row.
    fn measure(&self, run: &LineRun<'_>, range: Range<usize>) -> LineMetrics;

    /// Graphemes from `start` that fit in `available` width.
    ///
    /// Must return at least 1 while graphemes remain so layout always
    /// advances.
    fn suggest_break(&self, run: &LineRun<'_>, start: usize, available: f64, mode: BreakMode) -> usize;

    /// Width of an em in the default font.
    fn em_width(&self, typography: &Typography) -> f64;

    /// Height of a row in the default font.
    fn line_height(&self, typography: &Typography) -> f64;
}

/// Fixed cell-grid measurer.
///
/// Every grapheme occupies `unicode-width` cells (at least one; tabs expand
/// to the next stop). A font override scales its cells by its point size
/// relative to the default font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    cell_width: f64,
    cell_height: f64,
    tab_width: usize,
    width_method: WidthMethod,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl MonospaceMeasurer {
    #[must_use]
    pub const fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
            tab_width: 4,
            width_method: WidthMethod::WcWidth,
        }
    }

    #[must_use]
    pub const fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    #[must_use]
    pub const fn with_width_method(mut self, method: WidthMethod) -> Self {
        self.width_method = method;
        self
    }

    fn scale_at(&self, run: &LineRun<'_>, index: usize) -> f64 {
        let base = run.typography.font.point_size;
        if base <= 0.0 {
            return 1.0;
        }
        run.font_at(index).point_size / base
    }

    /// Visit graphemes from `start` with their index, text and advance.
    fn advances<'r>(
        &'r self,
        run: &'r LineRun<'_>,
        start: usize,
    ) -> impl Iterator<Item = (usize, &'r str, f64)> + 'r {
        let mut column = 0;
        graphemes(run.text)
            .enumerate()
            .skip(start)
            .map(move |(index, grapheme)| {
                let cells = grapheme_cells(grapheme, column, self.tab_width, self.width_method);
                column += cells;
                #[allow(clippy::cast_precision_loss)]
                let advance = cells as f64 * self.cell_width * self.scale_at(run, index);
                (index, grapheme, advance)
            })
    }

    fn ascent_split(&self) -> (f64, f64) {
        let ascent = (self.cell_height * 0.8).round();
        (ascent, self.cell_height - ascent)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, run: &LineRun<'_>, range: Range<usize>) -> LineMetrics {
        let (base_ascent, base_descent) = self.ascent_split();
        let mut scale = if range.is_empty() {
            1.0
        } else {
            0.0_f64
        };
        let mut x = 0.0;
        let mut width = 0.0;
        let mut caret_offsets = Vec::with_capacity(range.len() + 1);
        caret_offsets.push(0.0);

        for (index, grapheme, advance) in self.advances(run, range.start).take(range.len()) {
            scale = scale.max(self.scale_at(run, index));
            x += advance;
            caret_offsets.push(x);
            if !is_whitespace(grapheme) {
                width = x;
            }
        }

        LineMetrics {
            width,
            ascent: base_ascent * scale,
            descent: base_descent * scale,
            leading: 0.0,
            caret_offsets,
        }
    }

    fn suggest_break(&self, run: &LineRun<'_>, start: usize, available: f64, mode: BreakMode) -> usize {
        let mut x = 0.0;
        let mut last_break = None;
        let mut end = start;

        for (index, grapheme, advance) in self.advances(run, start) {
            if mode == BreakMode::Word && is_whitespace(grapheme) {
                // whitespace hangs past the edge
                x += advance;
                end = index + 1;
                last_break = Some(end);
                continue;
            }
            if x + advance > available && end > start {
                return last_break.unwrap_or(end) - start;
            }
            x += advance;
            end = index + 1;
        }
        (end - start).max(1)
    }

    fn em_width(&self, _typography: &Typography) -> f64 {
        self.cell_width
    }

    fn line_height(&self, _typography: &Typography) -> f64 {
        self.cell_height.round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn run<'a>(text: &'a str, typography: &'a Typography) -> LineRun<'a> {
        LineRun::new(text, typography, &[])
    }

    #[test]
    fn test_measure_cells() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::new(2.0, 10.0);
        let metrics = measurer.measure(&run("a漢b", &typography), 0..3);
        assert_eq!(metrics.width, 8.0);
        assert_eq!(metrics.caret_offsets, vec![0.0, 2.0, 6.0, 8.0]);
        assert_eq!(metrics.height(), 10.0);
        assert_eq!(metrics.ascent, 8.0);
    }

    #[test]
    fn test_trailing_whitespace_not_in_width() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::default();
        let metrics = measurer.measure(&run("aa bb ", &typography), 0..6);
        assert_eq!(metrics.width, 5.0);
        assert_eq!(metrics.caret_offsets.last(), Some(&6.0));
    }

    #[test]
    fn test_word_break_hangs_whitespace() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::default();
        let line = run("aa bb cc", &typography);
        assert_eq!(measurer.suggest_break(&line, 0, 5.0, BreakMode::Word), 6);
        assert_eq!(measurer.suggest_break(&line, 6, 5.0, BreakMode::Word), 2);
        assert_eq!(measurer.suggest_break(&line, 0, 5.0, BreakMode::Cluster), 5);
    }

    #[test]
    fn test_long_word_falls_back_to_clusters() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::default();
        let line = run("abcdefgh ij", &typography);
        assert_eq!(measurer.suggest_break(&line, 0, 3.0, BreakMode::Word), 3);
    }

    #[test]
    fn test_break_always_advances() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::default();
        let line = run("漢字", &typography);
        assert_eq!(measurer.suggest_break(&line, 0, 1.0, BreakMode::Cluster), 1);
        assert_eq!(measurer.suggest_break(&line, 0, -4.0, BreakMode::Word), 1);
    }

    #[test]
    fn test_tabs_expand() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::default().with_tab_width(4);
        let metrics = measurer.measure(&run("a\tb", &typography), 0..3);
        assert_eq!(metrics.caret_offsets, vec![0.0, 1.0, 4.0, 5.0]);
    }

    #[test]
    fn test_font_override_scales() {
        let typography = Typography::new(Font::new("mono", 10.0), Rgba::WHITE);
        let overrides = vec![(1..2, Style::font(Font::new("mono", 20.0)))];
        let line = LineRun::new("abc", &typography, &overrides);
        let measurer = MonospaceMeasurer::new(1.0, 10.0);

        let metrics = measurer.measure(&line, 0..3);
        assert_eq!(metrics.caret_offsets, vec![0.0, 1.0, 3.0, 4.0]);
        assert_eq!(metrics.height(), 20.0);
        assert_eq!(measurer.measure(&line, 2..3).height(), 10.0);
    }

    #[test]
    fn test_empty_range_has_default_height() {
        let typography = Typography::default();
        let measurer = MonospaceMeasurer::new(1.0, 16.0);
        let metrics = measurer.measure(&run("", &typography), 0..0);
        assert_eq!(metrics.width, 0.0);
        assert_eq!(metrics.height(), 16.0);
        assert_eq!(metrics.caret_offsets, vec![0.0]);
    }
}
