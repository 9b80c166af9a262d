//! Text content addressed by line and grapheme.
//!
//! Key types:
//!
//! - [`Position`] and [`Range`]: coordinates, with `"\r\n"` counted as one
//!   character
//! - [`TextBuffer`]: rope-backed content with an incrementally patched line
//!   index
//! - [`AttributeTable`]: style ranges rebased on every edit
//! - [`TextStorage`]: the buffer and its attributes behind one mutation API
//!   that announces each [`TextChange`]
//!
//! # Examples
//!
//! ```
//! use codeedit_engine::{Attribute, Position, Range, Rgba, TextStorage};
//!
//! let mut storage = TextStorage::with_text("abcdef");
//! storage.add_attribute(Attribute::Foreground(Rgba::RED), Range::on_line(0, 0, 6));
//! storage.insert("XY", Position::new(0, 3));
//!
//! assert_eq!(storage.text(), "abcXYdef");
//! assert_eq!(storage.attributes().len(), 2);
//! ```

mod attributes;
mod buffer;
mod edit;
mod line_index;
mod position;
mod rope;
mod storage;

pub use attributes::AttributeTable;
pub use buffer::{Splice, TextBuffer};
pub use edit::Edit;
pub use line_index::LineIndex;
pub use position::{Position, Range};
pub use rope::RopeWrapper;
pub use storage::{ChangeKind, SubscriptionId, TextChange, TextStorage};

pub(crate) use buffer::precondition;
