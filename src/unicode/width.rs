//! Display width of grapheme clusters in grid cells.
//!
//! Used by [`MonospaceMeasurer`](crate::layout::MonospaceMeasurer); hosts
//! with a real shaping backend never call into this module.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Get the display width of a string using a specific method.
#[must_use]
pub fn display_width_with_method(s: &str, method: WidthMethod) -> usize {
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}

/// Get the display width of a character using a specific method.
#[must_use]
pub fn display_width_char_with_method(c: char, method: WidthMethod) -> usize {
    match method {
        WidthMethod::WcWidth => UnicodeWidthChar::width(c).unwrap_or(0),
        WidthMethod::Unicode => UnicodeWidthChar::width_cjk(c).unwrap_or(0),
    }
}

/// Cell width of one grapheme cluster, expanding tabs to the next stop.
///
/// `column` is the cell column the cluster starts at. Printable clusters are
/// at least one cell wide so a caret can always sit on both sides of them.
#[must_use]
pub fn grapheme_cells(grapheme: &str, column: usize, tab_width: usize, method: WidthMethod) -> usize {
    if grapheme == "\t" {
        let tab_width = tab_width.max(1);
        return tab_width - (column % tab_width);
    }
    display_width_with_method(grapheme, method).max(1)
}
