//! Line layout: wrapping, vertical stacking and geometry queries.
//!
//! Key types:
//!
//! - [`LayoutEngine`]: incremental cache of [`LineLayout`] rows
//! - [`LayoutConfiguration`]: wrapping, spacing and overscroll settings
//! - [`TextMeasurer`]: measurement boundary, with [`MonospaceMeasurer`] as
//!   the built-in cell-grid implementation
//!
//! # Examples
//!
//! ```
//! use codeedit_engine::layout::{
//!     LayoutConfiguration, LayoutEngine, LineWrapping, MonospaceMeasurer, Typography,
//! };
//! use codeedit_engine::TextStorage;
//!
//! let storage = TextStorage::with_text("aa bb cc");
//! let config = LayoutConfiguration::new()
//!     .with_line_wrapping(LineWrapping::FixedWidth(5.0))
//!     .with_wrapped_indent(None);
//! let mut engine = LayoutEngine::new(config);
//! engine.layout(&storage, &MonospaceMeasurer::default(), &Typography::default(), 80.0);
//!
//! let rows = engine.line_layouts_for_line(0);
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].source_range.start.character, 6);
//! ```

mod config;
mod engine;
mod geometry;
mod measure;

pub use config::{LayoutConfiguration, LineSpacing, LineWrapping, Overscroll};
pub use engine::{LayoutEngine, LayoutStats, LineLayout};
pub use geometry::{Point, Rect, Size};
pub use measure::{BreakMode, LineMetrics, LineRun, MonospaceMeasurer, TextMeasurer, Typography};
