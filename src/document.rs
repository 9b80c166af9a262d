//! A text storage and the layout that follows it.
//!
//! [`Document`] owns both halves and wires them together: every mutation
//! goes through the storage, and the resulting [`TextChange`] invalidates
//! the layout before the call returns.

use crate::error::Result;
use crate::event::Logger;
use crate::layout::{
    LayoutConfiguration, LayoutEngine, LineLayout, MonospaceMeasurer, Point, Rect, Size,
    TextMeasurer, Typography,
};
use crate::style::{Attribute, Style};
use crate::text::{Edit, Position, Range, SubscriptionId, TextChange, TextStorage, precondition};
use std::fmt;

/// Editable text with styles and an incremental layout.
///
/// # Examples
///
/// ```
/// use codeedit_engine::{Document, Position};
///
/// let mut doc = Document::with_text("hello\nworld");
/// doc.layout(80.0);
/// let change = doc.insert("big ", Position::new(1, 0));
///
/// assert_eq!(doc.storage().line(1).as_deref(), Some("big world"));
/// doc.apply(&change.inverse());
/// assert_eq!(doc.text(), "hello\nworld");
/// ```
pub struct Document {
    storage: TextStorage,
    layout: LayoutEngine,
    measurer: Box<dyn TextMeasurer>,
    typography: Typography,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("storage", &self.storage)
            .field("layout", &self.layout)
            .field("typography", &self.typography)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Empty document measured on a one-unit cell grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_text("")
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            storage: TextStorage::with_text(text),
            layout: LayoutEngine::default(),
            measurer: Box::new(MonospaceMeasurer::default()),
            typography: Typography::default(),
        }
    }

    /// Measure text with `measurer`; invalidates the layout.
    #[must_use]
    pub fn with_measurer<M: TextMeasurer + 'static>(mut self, measurer: M) -> Self {
        self.measurer = Box::new(measurer);
        self.layout.invalidate_all();
        self
    }

    #[must_use]
    pub fn with_typography(mut self, typography: Typography) -> Self {
        self.set_typography(typography);
        self
    }

    #[must_use]
    pub fn with_configuration(mut self, configuration: LayoutConfiguration) -> Self {
        self.layout.set_configuration(configuration);
        self
    }

    /// Send storage and layout diagnostics to `logger`.
    #[must_use]
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn() -> Logger,
    {
        self.storage.set_logger(logger());
        self.layout.set_logger(logger());
        self
    }

    #[must_use]
    pub fn storage(&self) -> &TextStorage {
        &self.storage
    }

    #[must_use]
    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    #[must_use]
    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.storage.text()
    }

    pub fn set_typography(&mut self, typography: Typography) {
        if typography != self.typography {
            self.typography = typography;
            self.layout.invalidate_all();
        }
    }

    pub fn set_configuration(&mut self, configuration: LayoutConfiguration) {
        self.layout.set_configuration(configuration);
    }

    /// Register a change listener on the storage.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TextChange) + 'static,
    {
        self.storage.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.storage.unsubscribe(id)
    }

    /// # Panics
    ///
    /// Panics when `at` is not a valid position.
    pub fn insert(&mut self, text: &str, at: Position) -> TextChange {
        precondition(self.try_insert(text, at))
    }

    pub fn try_insert(&mut self, text: &str, at: Position) -> Result<TextChange> {
        let change = self.storage.try_insert(text, at)?;
        self.layout.invalidate(&change);
        Ok(change)
    }

    /// # Panics
    ///
    /// Panics on an invalid or inverted range.
    pub fn remove(&mut self, range: Range) -> TextChange {
        precondition(self.try_remove(range))
    }

    pub fn try_remove(&mut self, range: Range) -> Result<TextChange> {
        let change = self.storage.try_remove(range)?;
        self.layout.invalidate(&change);
        Ok(change)
    }

    /// Replace `range` with `text` as one change.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or inverted range.
    pub fn replace(&mut self, range: Range, text: &str) -> TextChange {
        precondition(self.try_replace(range, text))
    }

    pub fn try_replace(&mut self, range: Range, text: &str) -> Result<TextChange> {
        let change = self.storage.try_replace(range, text)?;
        self.layout.invalidate(&change);
        Ok(change)
    }

    /// Replay an edit, typically the inverse of an earlier change.
    ///
    /// # Panics
    ///
    /// Panics when the edit does not fit the current buffer.
    pub fn apply(&mut self, edit: &Edit) -> TextChange {
        precondition(self.try_apply(edit))
    }

    pub fn try_apply(&mut self, edit: &Edit) -> Result<TextChange> {
        match edit {
            Edit::Insert { text, at } => self.try_insert(text, *at),
            Edit::Remove { range } => self.try_remove(*range),
            Edit::Replace { range, text } => self.try_replace(*range, text),
        }
    }

    /// Merge `style` over `range` and relayout the lines it covers.
    ///
    /// # Panics
    ///
    /// Panics when `range` is not a valid range of this document.
    pub fn add_style(&mut self, style: Style, range: Range) {
        precondition(self.try_add_style(style, range));
    }

    pub fn try_add_style(&mut self, style: Style, range: Range) -> Result<()> {
        self.storage.try_add_style(style, range)?;
        self.layout.invalidate_lines(range.lines());
        Ok(())
    }

    /// # Panics
    ///
    /// Panics when `range` is not a valid range of this document.
    pub fn add_attribute(&mut self, attribute: Attribute, range: Range) {
        self.add_style(Style::from_attribute(attribute), range);
    }

    /// Position `n` graphemes away from `position`, if it exists.
    #[must_use]
    pub fn moved(&self, position: Position, n: isize) -> Option<Position> {
        position.moved(n, self.storage.buffer())
    }

    /// Run a layout pass for a frame `frame_width` wide.
    pub fn layout(&mut self, frame_width: f64) -> Size {
        self.layout
            .layout(&self.storage, self.measurer.as_ref(), &self.typography, frame_width)
    }

    #[must_use]
    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    #[must_use]
    pub fn caret_bounds(&self, position: Position) -> Option<Rect> {
        self.layout.caret_bounds(position)
    }

    #[must_use]
    pub fn position_at_point(&self, point: Point) -> Option<Position> {
        self.layout.position_at_point(point)
    }

    #[must_use]
    pub fn position_above(&self, position: Position) -> Option<Position> {
        self.layout.position_above(position)
    }

    #[must_use]
    pub fn position_below(&self, position: Position) -> Option<Position> {
        self.layout.position_below(position)
    }

    #[must_use]
    pub fn line_layouts_in(&self, rect: Rect) -> Vec<&LineLayout> {
        self.layout.line_layouts_in(rect)
    }
}
