//! Code-editor text engine.
//!
//! A grapheme-addressed text buffer, style ranges that survive edits, and an
//! incremental line layout that wraps, stacks and hit-tests rows. Rendering,
//! input handling and glyph shaping stay with the host: the layout engine
//! only talks to a [`TextMeasurer`](layout::TextMeasurer).

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional geometry casts
#![allow(clippy::cast_sign_loss)] // Intentional geometry conversions
#![allow(clippy::cast_precision_loss)] // Counts become layout units
#![allow(clippy::cast_possible_wrap)] // Line deltas are signed
#![allow(clippy::module_name_repetitions)] // Allow layout::LayoutEngine etc
#![allow(clippy::missing_errors_doc)] // try_* variants share one error type
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::float_cmp)] // Layout values are rounded to whole units
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine

pub mod color;
pub mod document;
pub mod error;
pub mod event;
pub mod layout;
pub mod style;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use color::Rgba;
pub use document::Document;
pub use error::{Error, Result};
pub use event::{Clock, LogLevel, Logger, SystemClock};
pub use style::{Attribute, Font, Style, TextAttributes};
pub use text::{
    AttributeTable, ChangeKind, Edit, Position, Range, Splice, SubscriptionId, TextBuffer, TextChange,
    TextStorage,
};

// Re-export layout types
pub use layout::{
    LayoutConfiguration, LayoutEngine, LineLayout, LineSpacing, LineWrapping, MonospaceMeasurer,
    Overscroll, TextMeasurer, Typography,
};
