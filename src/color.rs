//! RGBA color used by foreground/background style attributes.
//!
//! Colors are stored as 8-bit components so that attribute sets compare and
//! hash exactly; the text engine never blends, it only carries the color
//! through to the measurer and the host's renderer.

/// RGBA color with `u8` components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Opaque red.
    pub const RED: Self = Self::rgb(0xff, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 0xff, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 0xff);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }
}
