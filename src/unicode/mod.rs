//! Unicode utilities for grapheme handling and display width.

mod grapheme;
mod width;

pub use grapheme::{
    grapheme_byte_offset, grapheme_count, grapheme_indices, graphemes, is_line_terminator,
    is_whitespace, line_terminator_count, split_terminator,
};
pub use width::{
    WidthMethod, display_width_char_with_method, display_width_with_method, grapheme_cells,
};
