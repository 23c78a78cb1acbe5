//! Cell: one character position on the rendering surface.

use bitflags::bitflags;

bitflags! {
    /// Text style flags.
    ///
    /// # Example
    /// ```
    /// use clappy::Style;
    /// let style = Style::BOLD | Style::REVERSED;
    /// assert!(style.contains(Style::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Style: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0000_0100;
    }
}

impl std::fmt::Debug for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Style {
    /// SGR parameter for each flag, in emission order.
    pub(crate) const SGR: [(Self, &'static [u8]); 3] = [
        (Self::BOLD, b"\x1b[1m"),
        (Self::DIM, b"\x1b[2m"),
        (Self::REVERSED, b"\x1b[7m"),
    ];
}

/// A single character cell.
///
/// Wide characters occupy two cells; the second is a continuation cell that
/// the diff engine skips.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: char,
    /// Display width (0 = continuation, 1 = normal, 2 = wide).
    width: u8,
    style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// A blank, unstyled cell.
    pub const EMPTY: Self = Self {
        ch: ' ',
        width: 1,
        style: Style::empty(),
    };

    /// Create a cell from a character, measuring its display width.
    #[inline]
    pub fn new(ch: char) -> Self {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        Self {
            ch,
            width: u8::try_from(width).unwrap_or(1),
            style: Style::empty(),
        }
    }

    /// The trailing half of a wide character.
    #[inline]
    pub const fn wide_continuation() -> Self {
        Self {
            ch: ' ',
            width: 0,
            style: Style::empty(),
        }
    }

    /// Set the style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The character.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// Display width (0, 1, or 2).
    #[inline]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Style flags.
    #[inline]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Whether this is the trailing half of a wide character.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.width == 0
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("width", &self.width)
            .field("style", &self.style)
            .finish()
    }
}
