//! Layout configuration.

/// How logical lines are split into rows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LineWrapping {
    /// Each logical line is one row.
    #[default]
    None,
    /// Wrap at the frame width passed to each layout pass.
    FitToWidth,
    /// Wrap at a fixed width.
    FixedWidth(f64),
}

/// Extra space between rows, relative to the measured row height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineSpacing {
    Tight,
    #[default]
    Normal,
    Relaxed,
}

impl LineSpacing {
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Tight => 1.0,
            Self::Normal => 1.2,
            Self::Relaxed => 1.4,
        }
    }

    /// Space added below a row of height `height`.
    #[must_use]
    pub fn spacing_for(self, height: f64) -> f64 {
        (height * (self.multiplier() - 1.0)).round()
    }
}

/// Extra scrollable space after the last row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Overscroll {
    None,
    /// Eight default line heights.
    #[default]
    Automatic,
    Fixed(f64),
}

impl Overscroll {
    pub const AUTOMATIC_LINES: f64 = 8.0;

    /// Resolve to a height given the default line height.
    #[must_use]
    pub fn resolve(self, line_height: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Automatic => line_height * Self::AUTOMATIC_LINES,
            Self::Fixed(value) => value,
        }
    }
}

/// Settings for a [`LayoutEngine`](super::LayoutEngine).
///
/// Changing any field through
/// [`set_configuration`](super::LayoutEngine::set_configuration) invalidates
/// every line.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfiguration {
    pub line_wrapping: LineWrapping,
    /// Break after whitespace when possible; otherwise at any cluster.
    pub wrap_on_word_boundaries: bool,
    /// Indent continuation rows by `indent_level` em widths.
    pub indent_wrapped_continuations: bool,
    pub indent_level: f64,
    pub line_spacing: LineSpacing,
    pub overscroll: Overscroll,
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        Self {
            line_wrapping: LineWrapping::None,
            wrap_on_word_boundaries: true,
            indent_wrapped_continuations: true,
            indent_level: 2.0,
            line_spacing: LineSpacing::Normal,
            overscroll: Overscroll::Automatic,
        }
    }
}

impl LayoutConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_line_wrapping(mut self, wrapping: LineWrapping) -> Self {
        self.line_wrapping = wrapping;
        self
    }

    #[must_use]
    pub fn with_word_wrapping(mut self, enabled: bool) -> Self {
        self.wrap_on_word_boundaries = enabled;
        self
    }

    /// Set continuation indent in em widths; `None` disables it.
    #[must_use]
    pub fn with_wrapped_indent(mut self, level: Option<f64>) -> Self {
        self.indent_wrapped_continuations = level.is_some();
        if let Some(level) = level {
            self.indent_level = level;
        }
        self
    }

    #[must_use]
    pub fn with_line_spacing(mut self, spacing: LineSpacing) -> Self {
        self.line_spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_overscroll(mut self, overscroll: Overscroll) -> Self {
        self.overscroll = overscroll;
        self
    }

    /// Width rows wrap at, if any, for a frame of `frame_width`.
    ///
    /// Non-positive widths disable wrapping.
    #[must_use]
    pub fn wrap_width(&self, frame_width: f64) -> Option<f64> {
        let width = match self.line_wrapping {
            LineWrapping::None => return None,
            LineWrapping::FitToWidth => frame_width,
            LineWrapping::FixedWidth(width) => width,
        };
        (width > 0.0).then_some(width)
    }

    /// Continuation indent for a given em width.
    #[must_use]
    pub fn continuation_indent(&self, em_width: f64) -> f64 {
        if self.indent_wrapped_continuations {
            (em_width * self.indent_level).round()
        } else {
            0.0
        }
    }
}
