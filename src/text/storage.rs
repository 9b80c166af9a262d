//! Buffer plus attribute table, kept consistent through every edit.
//!
//! [`TextStorage`] is the only way to mutate text. Each insert, remove or
//! replace updates the line index, rebases the [`AttributeTable`], then hands a
//! [`TextChange`] to every subscriber, all before the call returns.

use super::attributes::AttributeTable;
use super::buffer::{TextBuffer, precondition};
use super::edit::Edit;
use super::position::{Position, Range};
use crate::error::Result;
use crate::event::{LogLevel, Logger};
use crate::style::{Attribute, Style};
use crate::unicode::line_terminator_count;
use std::borrow::Cow;
use std::fmt;

/// What a [`TextChange`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Removed,
    /// Text was swapped for other text, either by [`Edit::Replace`] or
    /// because an insert or removal regrouped the clusters at its edges.
    Replaced,
}

/// Notification describing one applied mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextChange {
    pub kind: ChangeKind,
    /// For inserts and replacements, the span the new text occupies. For
    /// removals, the span that was removed, in pre-removal coordinates.
    pub range: Range,
    /// Inserted text for inserts; for removals and replacements, the text
    /// that was taken out.
    pub text: String,
    /// Net change in line count.
    pub line_delta: isize,
    /// Buffer revision after the change.
    pub revision: u64,
    /// Whether style ranges outside the edited lines were dropped because
    /// they no longer fit the buffer.
    pub attributes_dropped: bool,
}

impl TextChange {
    /// Edit that undoes this change.
    #[must_use]
    pub fn inverse(&self) -> Edit {
        match self.kind {
            ChangeKind::Inserted => Edit::remove(self.range),
            ChangeKind::Removed => Edit::insert(self.text.clone(), self.range.start),
            ChangeKind::Replaced => Edit::replace(self.range, self.text.clone()),
        }
    }

    /// Logical lines this change touched before it happened.
    ///
    /// An insert touches only its start line; a removal every line it spans.
    /// A replacement spans its new lines minus the lines it added.
    #[must_use]
    pub fn old_line_span(&self) -> std::ops::Range<usize> {
        let first = self.range.start.line;
        match self.kind {
            ChangeKind::Inserted => first..first + 1,
            ChangeKind::Removed => first..self.range.end.line + 1,
            ChangeKind::Replaced => {
                let last = self
                    .range
                    .end
                    .line
                    .saturating_add_signed(self.line_delta.saturating_neg());
                first..last.max(first) + 1
            }
        }
    }
}

/// Handle returned by [`TextStorage::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&TextChange)>;

/// Text buffer with edit-stable style ranges and change listeners.
#[derive(Default)]
pub struct TextStorage {
    buffer: TextBuffer,
    attributes: AttributeTable,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    logger: Logger,
}

impl fmt::Debug for TextStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStorage")
            .field("buffer", &self.buffer)
            .field("attributes", &self.attributes)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl TextStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: TextBuffer::with_text(text),
            ..Self::default()
        }
    }

    /// Route attribute diagnostics to `logger`.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    #[must_use]
    pub fn lines_count(&self) -> usize {
        self.buffer.lines_count()
    }

    #[must_use]
    pub fn len_graphemes(&self) -> usize {
        self.buffer.len_graphemes()
    }

    #[must_use]
    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.buffer.line(line)
    }

    #[must_use]
    pub fn line_content(&self, line: usize) -> Option<String> {
        self.buffer.line_content(line)
    }

    #[must_use]
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.buffer.line_len(line)
    }

    #[must_use]
    pub fn character_at(&self, position: Position) -> Option<String> {
        self.buffer.character_at(position)
    }

    /// # Panics
    ///
    /// Panics on an invalid or inverted range.
    #[must_use]
    pub fn string_in(&self, range: Range) -> String {
        self.buffer.string_in(range)
    }

    /// # Panics
    ///
    /// Panics when `position` is not in the buffer.
    #[must_use]
    pub fn character_index(&self, position: Position) -> usize {
        self.buffer.character_index(position)
    }

    #[must_use]
    pub fn position_at_character_index(&self, index: usize) -> Option<Position> {
        self.buffer.position_at_character_index(index)
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Register a listener called after every mutation, in registration
    /// order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TextChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Merge `style` into the entry for exactly `range`.
    ///
    /// # Panics
    ///
    /// Panics when `range` is not a valid range of this buffer.
    pub fn add_style(&mut self, style: Style, range: Range) {
        precondition(self.try_add_style(style, range));
    }

    pub fn try_add_style(&mut self, style: Style, range: Range) -> Result<()> {
        self.buffer.validate_range(range)?;
        self.attributes.add(style, range);
        Ok(())
    }

    /// Set one attribute over `range`.
    ///
    /// # Panics
    ///
    /// Panics when `range` is not a valid range of this buffer.
    pub fn add_attribute(&mut self, attribute: Attribute, range: Range) {
        self.add_style(Style::from_attribute(attribute), range);
    }

    /// Insert `text` at `at`.
    ///
    /// # Panics
    ///
    /// Panics when `at` is not a valid position.
    pub fn insert(&mut self, text: &str, at: Position) -> TextChange {
        precondition(self.try_insert(text, at))
    }

    /// Insert `text` at `at`, or report why `at` is invalid.
    pub fn try_insert(&mut self, text: &str, at: Position) -> Result<TextChange> {
        self.splice(Range::caret(at), text, ChangeKind::Inserted)
    }

    /// Remove the half-open `range`.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or inverted range.
    pub fn remove(&mut self, range: Range) -> TextChange {
        precondition(self.try_remove(range))
    }

    /// Remove `range`, or report why it is invalid.
    pub fn try_remove(&mut self, range: Range) -> Result<TextChange> {
        self.splice(range, "", ChangeKind::Removed)
    }

    /// Replace `range` with `text` as a single change.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or inverted range.
    pub fn replace(&mut self, range: Range, text: &str) -> TextChange {
        precondition(self.try_replace(range, text))
    }

    pub fn try_replace(&mut self, range: Range, text: &str) -> Result<TextChange> {
        self.splice(range, text, ChangeKind::Replaced)
    }

    fn splice(&mut self, range: Range, text: &str, kind: ChangeKind) -> Result<TextChange> {
        self.buffer.validate_range(range)?;
        let lines_before = self.buffer.lines_count();
        let graphemes_before = self.buffer.len_graphemes();
        let start_index = self.buffer.try_character_index(range.start)?;
        let end_index = self.buffer.try_character_index(range.end)?;
        let splice = self.buffer.try_replace(range, text)?;
        let line_delta = line_delta(lines_before, self.buffer.lines_count());

        // Rebase by grapheme counts: styles keep following the clusters
        // they covered even when an edge cluster absorbed the new text.
        let kept = graphemes_before - (end_index - start_index);
        let inserted = self.buffer.len_graphemes().saturating_sub(kept);
        let inserted_end = self
            .buffer
            .position_at_character_index(start_index + inserted)
            .unwrap_or(range.start);
        self.attributes.rebase_after_remove(range, &self.logger);
        self.attributes.rebase_after_insert(range.start, inserted_end);

        let expected_delta =
            signed(line_terminator_count(text)) - signed(line_terminator_count(&splice.removed));
        let attributes_dropped = if splice.merged || line_delta != expected_delta {
            self.drop_invalid_attributes() > 0
        } else {
            false
        };

        let (kind, range, text) = match kind {
            _ if splice.merged => (ChangeKind::Replaced, splice.range, splice.replaced),
            ChangeKind::Inserted => (kind, splice.range, text.to_string()),
            ChangeKind::Removed => (kind, range, splice.removed),
            ChangeKind::Replaced => (kind, splice.range, splice.replaced),
        };
        let change = TextChange {
            kind,
            range,
            text,
            line_delta,
            revision: self.buffer.revision(),
            attributes_dropped,
        };
        self.notify(&change);
        Ok(change)
    }

    /// Replay an edit.
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

    // A "\r" and "\n" meeting at an edit boundary fold into one terminator,
    // so line arithmetic alone can leave a key pointing past its line.
    fn drop_invalid_attributes(&mut self) -> usize {
        let buffer = &self.buffer;
        self.attributes
            .retain_valid(|range| buffer.validate_range(*range).is_ok(), &self.logger)
    }

    fn notify(&mut self, change: &TextChange) {
        self.logger.emit_with(LogLevel::Debug, || {
            format!(
                "{:?} {} (lines {:+}, revision {})",
                change.kind, change.range, change.line_delta, change.revision
            )
        });
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn line_delta(before: usize, after: usize) -> isize {
    after as isize - before as isize
}

#[allow(clippy::cast_possible_wrap)]
const fn signed(count: usize) -> isize {
    count as isize
}
