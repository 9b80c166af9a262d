//! Style attributes attached to ranges of text.
//!
//! - [`TextAttributes`]: bitflags for bold, italic, underline, strikethrough
//! - [`Font`]: a font override (family + point size)
//! - [`Attribute`]: a single key/value pair, as passed to
//!   [`TextStorage::add_attribute`](crate::TextStorage::add_attribute)
//! - [`Style`]: the merged attribute set stored per range
//!
//! ```
//! use codeedit_engine::{Attribute, Rgba, Style, TextAttributes};
//!
//! let mut style = Style::fg(Rgba::RED);
//! style.apply(Attribute::Flags(TextAttributes::BOLD));
//! assert_eq!(style.fg, Some(Rgba::RED));
//! assert!(style.attributes.contains(TextAttributes::BOLD));
//! ```

use crate::color::Rgba;
use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// Font-independent rendering flags.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        const BOLD          = 0x01;
        const ITALIC        = 0x02;
        const UNDERLINE     = 0x04;
        const STRIKETHROUGH = 0x08;
    }
}

/// Font override for a range, or the document default.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: Arc<str>,
    pub point_size: f64,
}

impl Font {
    #[must_use]
    pub fn new(family: &str, point_size: f64) -> Self {
        Self {
            family: Arc::from(family),
            point_size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("monospace", 13.0)
    }
}

/// One style attribute key with its value.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Foreground(Rgba),
    Background(Rgba),
    Font(Font),
    Flags(TextAttributes),
}

/// Set of style attributes stored for one range.
///
/// `None` means "inherit the document default" for that key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub font: Option<Font>,
    pub attributes: TextAttributes,
}

impl Style {
    /// Empty style with no overrides.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        font: None,
        attributes: TextAttributes::empty(),
    };

    /// Style with only a foreground color.
    #[must_use]
    pub const fn fg(color: Rgba) -> Self {
        Self {
            fg: Some(color),
            bg: None,
            font: None,
            attributes: TextAttributes::empty(),
        }
    }

    /// Style with only a background color.
    #[must_use]
    pub const fn bg(color: Rgba) -> Self {
        Self {
            fg: None,
            bg: Some(color),
            font: None,
            attributes: TextAttributes::empty(),
        }
    }

    /// Style with only a font override.
    #[must_use]
    pub fn font(font: Font) -> Self {
        Self {
            fg: None,
            bg: None,
            font: Some(font),
            attributes: TextAttributes::empty(),
        }
    }

    #[must_use]
    pub const fn bold() -> Self {
        Self {
            fg: None,
            bg: None,
            font: None,
            attributes: TextAttributes::BOLD,
        }
    }

    /// Build a style holding a single attribute.
    #[must_use]
    pub fn from_attribute(attribute: Attribute) -> Self {
        let mut style = Self::NONE;
        style.apply(attribute);
        style
    }

    /// Set one attribute, replacing any previous value for the same key.
    /// Flags accumulate.
    pub fn apply(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Foreground(color) => self.fg = Some(color),
            Attribute::Background(color) => self.bg = Some(color),
            Attribute::Font(font) => self.font = Some(font),
            Attribute::Flags(flags) => self.attributes |= flags,
        }
    }

    #[must_use]
    pub fn with_fg(mut self, color: Rgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attrs: TextAttributes) -> Self {
        self.attributes |= attrs;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.font.is_none() && self.attributes.is_empty()
    }

    /// Merge two styles, with `other` taking precedence for set values.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            font: other.font.clone().or_else(|| self.font.clone()),
            attributes: self.attributes | other.attributes,
        }
    }
}
